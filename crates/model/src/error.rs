use thiserror::Error;

use features::FeatureError;

/// Errors surfaced by the model layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Classifier configuration violates an invariant (threshold ordering,
    /// zero batch size).
    #[error("invalid classifier config: {0}")]
    InvalidConfig(String),
    /// Prediction or export requested before any weights exist.
    #[error("model is not ready: no weights have been set, trained, or loaded")]
    NotReady,
    /// A serialized weight artifact failed validation; existing state is
    /// left untouched.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
    /// The model has no feature extractor attached but the operation needs
    /// one.
    #[error("no feature extractor attached to the model")]
    MissingExtractor,
    /// Feature extraction failed while preparing a prediction.
    #[error("feature extraction failed: {0}")]
    Feature(#[from] FeatureError),
}
