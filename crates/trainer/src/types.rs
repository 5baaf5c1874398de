//! Training outcome and progress types.

use serde::{Deserialize, Serialize};

/// Metrics recorded for one gradient-descent iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IterationMetrics {
    /// Zero-based iteration index.
    pub iteration: u32,
    /// Regularized binary cross-entropy over the training split.
    pub loss: f64,
    /// Fraction of training examples classified correctly at 0.5.
    pub accuracy: f64,
    /// Validation-split loss, when a validation set exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val_loss: Option<f64>,
    /// Validation-split accuracy, when a validation set exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val_accuracy: Option<f64>,
}

/// Snapshot handed to the progress callback every `progress_interval`
/// iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingProgress {
    pub iteration: u32,
    pub max_iterations: u32,
    pub loss: f64,
    pub accuracy: f64,
    pub val_loss: Option<f64>,
    pub val_accuracy: Option<f64>,
}

/// Outcome of one training run. Immutable once returned.
///
/// Training never surfaces failures as errors: `success == false` plus a
/// populated `error` string is the only failure channel, so pipelines can
/// batch many runs without per-call error handling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingResult {
    pub success: bool,
    /// Final weights on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    /// Final bias on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias: Option<f64>,
    /// Metrics from the last recorded iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_metrics: Option<IterationMetrics>,
    /// Per-iteration metrics, in order. Never longer than `max_iterations`.
    #[serde(default)]
    pub history: Vec<IterationMetrics>,
    pub training_time_ms: u64,
    /// Whether early stopping ended the run before `max_iterations`.
    pub early_stopped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrainingResult {
    /// A failed run that never produced weights.
    pub(crate) fn failure(error: String, training_time_ms: u64) -> Self {
        Self {
            success: false,
            weights: None,
            bias: None,
            final_metrics: None,
            history: Vec::new(),
            training_time_ms,
            early_stopped: false,
            error: Some(error),
        }
    }
}
