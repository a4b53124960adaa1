use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the collision engine.
///
/// Stale events and "never" predictions are not errors; they are ordinary
/// outcomes and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// `extract_min` was called on an empty event queue.
    #[error("event queue is empty")]
    EmptyQueue,

    /// Invalid configuration or particle data.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Numerical issue (NaN event time, coincident centers).
    #[error("numerical error: {0}")]
    MathError(String),

    /// Configuration could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidParam("radius must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("radius"));
        assert_eq!(Error::EmptyQueue.to_string(), "event queue is empty");
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
