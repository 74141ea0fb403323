//! Error types for SentiServe

use std::fmt;
use std::path::PathBuf;

/// Result type alias using SentiServe's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SentiServe operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model file does not exist; no load strategy was attempted
    #[error("Model file not found at {}", path.display())]
    ModelNotFound { path: PathBuf },

    /// Every load strategy failed
    #[error("{0}")]
    Load(LoadFailure),

    /// A load strategy could not decode the model bytes
    #[error("{0}")]
    Decode(String),

    /// A decoded model document is structurally invalid
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// A predictor call failed
    #[error("{0}")]
    Prediction(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new invalid model error
    pub fn invalid_model(msg: impl Into<String>) -> Self {
        Self::InvalidModel(msg.into())
    }

    /// Create a new prediction error
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }
}

impl From<LoadFailure> for Error {
    fn from(failure: LoadFailure) -> Self {
        Self::Load(failure)
    }
}

/// One failed load attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    /// Name of the strategy that was attempted
    pub strategy: String,

    /// Error message the strategy produced
    pub message: String,
}

/// Every load attempt that failed, in attempt order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadFailure {
    attempts: Vec<StrategyFailure>,
}

impl LoadFailure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failure of one strategy
    pub fn record(&mut self, strategy: impl Into<String>, message: impl Into<String>) {
        self.attempts.push(StrategyFailure {
            strategy: strategy.into(),
            message: message.into(),
        });
    }

    pub fn attempts(&self) -> &[StrategyFailure] {
        &self.attempts
    }

    /// Error message recorded for a strategy, if it was attempted
    pub fn message_for(&self, strategy: &str) -> Option<&str> {
        self.attempts
            .iter()
            .find(|a| a.strategy == strategy)
            .map(|a| a.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load model. Attempts: {{")?;
        for (i, attempt) in self.attempts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", attempt.strategy, attempt.message)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_failure_keeps_attempt_order() {
        let mut failure = LoadFailure::new();
        failure.record("json", "expected value at line 1 column 1");
        failure.record("yaml", "invalid type: string");

        let names: Vec<_> = failure.attempts().iter().map(|a| a.strategy.as_str()).collect();
        assert_eq!(names, vec!["json", "yaml"]);
        assert_eq!(failure.message_for("yaml"), Some("invalid type: string"));
        assert_eq!(failure.message_for("pickle"), None);
    }

    #[test]
    fn test_load_failure_display() {
        let mut failure = LoadFailure::new();
        failure.record("json", "bad");
        failure.record("yaml", "worse");

        assert_eq!(
            Error::from(failure).to_string(),
            "Failed to load model. Attempts: {json: bad, yaml: worse}"
        );
    }

    #[test]
    fn test_model_not_found_display() {
        let err = Error::ModelNotFound {
            path: PathBuf::from("/models/sentiment_model.json"),
        };
        assert_eq!(
            err.to_string(),
            "Model file not found at /models/sentiment_model.json"
        );
    }
}
