use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid ballot parameters: {0}")]
    InvalidParams(String),
}

/// How a caller should react to a failed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureClass {
    /// A business-rule rejection. Retrying cannot succeed until state changes
    /// (or, for a cooldown, until the reported wait has elapsed).
    Rejected,
    /// An infrastructure fault. Re-query state, then retry.
    Transient,
}
