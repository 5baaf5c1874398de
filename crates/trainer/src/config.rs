use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// Hyperparameters for one training run.
///
/// All defaults are deliberately conservative; callers tune per dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingConfig {
    /// Gradient-descent step size.
    #[serde(default = "TrainingConfig::default_learning_rate")]
    pub learning_rate: f64,
    /// Upper bound on gradient-descent iterations.
    #[serde(default = "TrainingConfig::default_max_iterations")]
    pub max_iterations: u32,
    /// L2 regularization strength (0 disables).
    #[serde(default = "TrainingConfig::default_regularization")]
    pub regularization: f64,
    /// Fraction of examples held out for validation, in `[0, 1)`. Zero
    /// disables validation and therefore early stopping.
    #[serde(default = "TrainingConfig::default_validation_split")]
    pub validation_split: f64,
    /// Iterations without validation-loss improvement before stopping.
    #[serde(default = "TrainingConfig::default_early_stopping_patience")]
    pub early_stopping_patience: u32,
    /// Minimum validation-loss decrease that counts as an improvement.
    #[serde(default = "TrainingConfig::default_min_improvement")]
    pub min_improvement: f64,
    /// How often (in iterations) the progress callback fires.
    #[serde(default = "TrainingConfig::default_progress_interval")]
    pub progress_interval: u32,
    /// Seed for the shuffle and initialization generators. `None` draws
    /// from entropy; a fixed value makes the whole run reproducible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub(crate) fn default_learning_rate() -> f64 {
        0.1
    }

    pub(crate) fn default_max_iterations() -> u32 {
        100
    }

    pub(crate) fn default_regularization() -> f64 {
        0.01
    }

    pub(crate) fn default_validation_split() -> f64 {
        0.2
    }

    pub(crate) fn default_early_stopping_patience() -> u32 {
        10
    }

    pub(crate) fn default_min_improvement() -> f64 {
        1e-4
    }

    pub(crate) fn default_progress_interval() -> u32 {
        10
    }

    /// Validate hyperparameter ranges.
    pub fn validate(&self) -> Result<(), TrainerError> {
        if !(self.learning_rate > 0.0) {
            return Err(TrainerError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_iterations == 0 {
            return Err(TrainerError::InvalidConfig(
                "max_iterations must be greater than zero".into(),
            ));
        }
        if !(self.regularization >= 0.0) {
            return Err(TrainerError::InvalidConfig(format!(
                "regularization must be nonnegative, got {}",
                self.regularization
            )));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(TrainerError::InvalidConfig(format!(
                "validation_split must lie in [0, 1), got {}",
                self.validation_split
            )));
        }
        if self.early_stopping_patience == 0 {
            return Err(TrainerError::InvalidConfig(
                "early_stopping_patience must be greater than zero".into(),
            ));
        }
        if !(self.min_improvement >= 0.0) {
            return Err(TrainerError::InvalidConfig(format!(
                "min_improvement must be nonnegative, got {}",
                self.min_improvement
            )));
        }
        if self.progress_interval == 0 {
            return Err(TrainerError::InvalidConfig(
                "progress_interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: Self::default_learning_rate(),
            max_iterations: Self::default_max_iterations(),
            regularization: Self::default_regularization(),
            validation_split: Self::default_validation_split(),
            early_stopping_patience: Self::default_early_stopping_patience(),
            min_improvement: Self::default_min_improvement(),
            progress_interval: Self::default_progress_interval(),
            seed: None,
        }
    }
}
