//! Prediction, metadata, and persisted-weight types for the model layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use features::{FeatureVector, MatchLabel};

/// One prediction over a record pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MlPrediction {
    /// Match probability in `[0.0, 1.0]`.
    pub probability: f64,
    /// Threshold-based classification of the probability.
    pub classification: MatchLabel,
    /// Distance-to-threshold confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// The feature vector the prediction was computed from.
    pub features: FeatureVector,
    /// Per-feature contribution breakdown, present when enabled in the
    /// classifier config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<Vec<FeatureImportance>>,
}

/// Contribution of a single feature to a prediction's logit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureImportance {
    pub name: String,
    pub value: f64,
    pub weight: f64,
    /// `value * weight`, signed.
    pub contribution: f64,
    /// `|contribution|`.
    pub importance: f64,
}

/// Descriptive metadata carried by a model instance.
///
/// Invariant: once a model is ready, `feature_names.len()` equals the weight
/// count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMetadata {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_examples: Option<usize>,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

/// The persisted weight artifact — the only model state that crosses process
/// boundaries. JSON-compatible; field names follow the external wire format.
///
/// Invariant: `feature_names.len() == weights.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SerializedWeights {
    /// Type tag guarding against loading a foreign model's weights.
    pub model_type: String,
    /// Artifact schema version.
    pub version: String,
    pub weights: Vec<f64>,
    pub bias: f64,
    pub feature_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<WeightsExtra>,
}

/// Optional provenance attached to a weight artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightsExtra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_examples: Option<usize>,
}
