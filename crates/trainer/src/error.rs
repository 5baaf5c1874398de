use thiserror::Error;

use features::FeatureError;
use model::ModelError;

/// Internal training failures.
///
/// These never escape [`Trainer::train`]: every variant is folded into a
/// `TrainingResult { success: false, error: Some(..) }` so batch training
/// pipelines can proceed without wrapping each call.
///
/// [`Trainer::train`]: crate::Trainer::train
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainerError {
    #[error("invalid training config: {0}")]
    InvalidConfig(String),
    #[error("training dataset is empty")]
    EmptyDataset,
    #[error("no feature extractor configured for training")]
    MissingExtractor,
    #[error("feature extraction failed: {0}")]
    Feature(#[from] FeatureError),
    #[error("model rejected a training step: {0}")]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert!(TrainerError::EmptyDataset.to_string().contains("empty"));
        assert!(TrainerError::MissingExtractor
            .to_string()
            .contains("feature extractor"));
        let err = TrainerError::InvalidConfig("learning_rate must be positive".into());
        assert!(err.to_string().contains("learning_rate"));
    }
}
