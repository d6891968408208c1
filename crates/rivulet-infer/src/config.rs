//! Inference engine configuration.

use rivulet_core::ConfigError;

/// Tunables of the inference engine.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceConfig {
    /// How many of the four deduction waves to run, in order. Lower values
    /// trade accuracy for speed. Range `1..=4`, default 4.
    pub waves_to_use: u8,
    /// Wave 4 stops growing a candidate path once its certainty drops
    /// below this and counts it as valid. `0.0` makes the enumeration
    /// exhaustive, and cells no path reaches are then resolved to ground,
    /// provided every tree finished within [`path_search_budget`].
    /// Default 0.005.
    ///
    /// [`path_search_budget`]: Self::path_search_budget
    pub path_certainty_threshold: f64,
    /// Most path steps Wave 4 spends on the tree of one dangling water
    /// cell. A tree that runs out keeps the paths it settled and the pass
    /// resolves nothing. Default 50 000.
    pub path_search_budget: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            waves_to_use: 4,
            path_certainty_threshold: 0.005,
            path_search_budget: 50_000,
        }
    }
}

impl InferenceConfig {
    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=4).contains(&self.waves_to_use) {
            return Err(ConfigError::InvalidSetting {
                name: "waves_to_use",
                value: self.waves_to_use as f64,
                reason: "must be between 1 and 4",
            });
        }
        let t = self.path_certainty_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(ConfigError::InvalidSetting {
                name: "path_certainty_threshold",
                value: t,
                reason: "must be finite and within [0, 1]",
            });
        }
        if self.path_search_budget == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "path_search_budget",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Whether Wave 4 runs exhaustively.
    pub(crate) fn exhaustive(&self) -> bool {
        self.path_certainty_threshold == 0.0
    }

    /// Whether `wave` (1-based) is enabled.
    pub(crate) fn uses(&self, wave: u8) -> bool {
        wave <= self.waves_to_use
    }
}
