use thiserror::Error;

use model::ModelError;

/// Errors produced by the score-integration layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegrateError {
    /// Invalid integration configuration or mismatched batch inputs.
    #[error("invalid integration config: {0}")]
    InvalidConfig(String),
    /// The prediction did not resolve within the configured window.
    #[error("ML prediction timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    /// The model rejected or failed the prediction.
    #[error("ML prediction failed: {0}")]
    Prediction(String),
    /// A model-layer error outside the prediction path.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_the_window() {
        let err = IntegrateError::Timeout { timeout_ms: 10 };
        assert!(err.to_string().contains("timed out"));
        assert!(err.to_string().contains("10ms"));
    }

    #[test]
    fn prediction_failure_names_the_cause() {
        let err = IntegrateError::Prediction("model is not ready".into());
        assert!(err.to_string().contains("ML prediction failed"));
        assert!(err.to_string().contains("not ready"));
    }
}
