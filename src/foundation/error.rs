/// Result alias used by every fallible setup-time operation.
pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Errors surfaced while building a narrative track.
///
/// Per-frame evaluation never produces these; it degrades to "hold last state" or
/// "use default" instead.
#[derive(thiserror::Error, Debug)]
pub enum NarrativeError {
    /// A value violated an ordering or range invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other failure, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NarrativeError {
    /// Build a [`NarrativeError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NarrativeError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for NarrativeError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
