//! Diagnostics sink interface.
//!
//! Both engines report counters and free-form comments (attempt numbers,
//! cells resolved per wave, map previews) through [`StatsSink`]. The sink
//! never influences the algorithms: every engine behaves identically when
//! handed a [`NoopSink`].
//!
//! Three sinks ship with the crate:
//! - [`NoopSink`]: discards everything.
//! - [`RecordingSink`]: keeps an in-memory tree of scopes, for tests and
//!   offline inspection.
//! - [`TracingSink`]: forwards every record as a `tracing` event.

use indexmap::IndexMap;

/// Narrow reporting interface for structured diagnostics.
pub trait StatsSink {
    /// Set `key` to `value` in the current scope, replacing any prior value.
    fn record_value(&mut self, key: &str, value: f64);

    /// Append a free-form comment to the current scope.
    fn record_comment(&mut self, text: &str);

    /// Open a nested scope. Records written to the returned sink belong to
    /// the child; the child is closed when it is dropped.
    fn start_child_scope(&mut self, name: &str) -> Box<dyn StatsSink + '_>;
}

impl<S: StatsSink + ?Sized> StatsSink for &mut S {
    fn record_value(&mut self, key: &str, value: f64) {
        (**self).record_value(key, value);
    }

    fn record_comment(&mut self, text: &str) {
        (**self).record_comment(text);
    }

    fn start_child_scope(&mut self, name: &str) -> Box<dyn StatsSink + '_> {
        (**self).start_child_scope(name)
    }
}

// ── NoopSink ───────────────────────────────────────────────────────

/// A sink that discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl StatsSink for NoopSink {
    fn record_value(&mut self, _key: &str, _value: f64) {}

    fn record_comment(&mut self, _text: &str) {}

    fn start_child_scope(&mut self, _name: &str) -> Box<dyn StatsSink + '_> {
        Box::new(NoopSink)
    }
}

// ── RecordingSink ──────────────────────────────────────────────────

/// In-memory tree of diagnostics scopes.
///
/// Values keep their insertion order so rendered reports are stable
/// across runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSink {
    /// Scope name.
    pub name: String,
    /// Values recorded directly in this scope.
    pub values: IndexMap<String, f64>,
    /// Comments recorded directly in this scope, in order.
    pub comments: Vec<String>,
    /// Nested scopes, in creation order.
    pub children: Vec<RecordingSink>,
}

impl RecordingSink {
    /// Create an empty root scope.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Look up a value recorded directly in this scope.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&RecordingSink> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Sum of `key` over this scope and every descendant.
    pub fn total(&self, key: &str) -> f64 {
        self.value(key).unwrap_or(0.0) + self.children.iter().map(|c| c.total(key)).sum::<f64>()
    }
}

impl StatsSink for RecordingSink {
    fn record_value(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    fn record_comment(&mut self, text: &str) {
        self.comments.push(text.to_string());
    }

    fn start_child_scope(&mut self, name: &str) -> Box<dyn StatsSink + '_> {
        let idx = self.children.len();
        self.children.push(RecordingSink::new(name));
        Box::new(&mut self.children[idx])
    }
}

// ── TracingSink ────────────────────────────────────────────────────

/// Forwards diagnostics to `tracing` at debug level.
///
/// Nested scopes are flattened into a `/`-separated scope path.
#[derive(Clone, Debug)]
pub struct TracingSink {
    scope: String,
}

impl TracingSink {
    /// Create a root sink reporting under `scope`.
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    /// The `/`-separated scope path.
    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl StatsSink for TracingSink {
    fn record_value(&mut self, key: &str, value: f64) {
        tracing::debug!(scope = %self.scope, key, value, "stat");
    }

    fn record_comment(&mut self, text: &str) {
        tracing::debug!(scope = %self.scope, "{text}");
    }

    fn start_child_scope(&mut self, name: &str) -> Box<dyn StatsSink + '_> {
        Box::new(TracingSink::new(format!("{}/{}", self.scope, name)))
    }
}
