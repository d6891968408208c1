//! Out-of-bounds handling policies.

/// What an access does with positions outside the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutOfBounds {
    /// Fail with [`GridError::OutOfBounds`](crate::GridError::OutOfBounds).
    #[default]
    Throw,
    /// Leave the position out of the result.
    Ignore,
    /// Produce a placeholder cell holding `T::default()`.
    TreatAsDefault,
}
