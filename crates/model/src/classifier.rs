use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use features::{FeatureExtractor, FeatureVector, RecordPair};

use crate::config::ClassifierConfig;
use crate::error::ModelError;
use crate::score::{classify, confidence, probability};
use crate::types::{
    FeatureImportance, MlPrediction, ModelMetadata, SerializedWeights, WeightsExtra,
};

/// Type tag written into every persisted weight artifact and required on
/// load.
pub const MODEL_TYPE: &str = "logistic-regression";

/// Current weight-artifact schema version.
pub const WEIGHTS_SCHEMA_VERSION: &str = "v1";

/// Capability interface for match-scoring models.
///
/// `predict` is asynchronous by contract: implementations may call out to a
/// remotely hosted model even though [`LogisticModel`] is pure computation.
/// Weight mutation (`load_weights`) is assumed to happen only between, not
/// during, concurrent `predict` calls; concurrent mutation while predictions
/// are in flight is a precondition violation, not something implementations
/// guard against.
#[async_trait]
pub trait MatchModel: Send + Sync {
    /// Score one record pair.
    async fn predict(&self, pair: &RecordPair) -> Result<MlPrediction, ModelError>;

    /// Score a batch of pairs. Output order matches input order.
    async fn predict_batch(&self, pairs: &[RecordPair]) -> Result<Vec<MlPrediction>, ModelError>;

    /// Run the attached feature extractor over a pair.
    fn extract_features(&self, pair: &RecordPair) -> Result<FeatureVector, ModelError>;

    /// Replace model state from a persisted artifact. All-or-nothing: on any
    /// validation failure the existing state is preserved.
    fn load_weights(&self, serialized: &SerializedWeights) -> Result<(), ModelError>;

    /// Export current state as a persisted artifact (defensive copy).
    fn export_weights(&self) -> Result<SerializedWeights, ModelError>;

    /// Whether weights exist and predictions can run.
    fn is_ready(&self) -> bool;

    /// The classifier's decision configuration.
    fn config(&self) -> &ClassifierConfig;

    /// Descriptive metadata (owned copy).
    fn metadata(&self) -> ModelMetadata;
}

struct ModelState {
    weights: Vec<f64>,
    bias: f64,
}

/// Logistic-regression implementation of [`MatchModel`].
///
/// The model starts "not ready"; it becomes ready once weights are set by
/// training, manual assignment, or a successful [`MatchModel::load_weights`].
/// Weight accessors return owned copies so callers can never mutate internal
/// state through a returned reference.
pub struct LogisticModel {
    config: ClassifierConfig,
    extractor: Option<Arc<FeatureExtractor>>,
    state: RwLock<Option<ModelState>>,
    metadata: RwLock<ModelMetadata>,
}

impl LogisticModel {
    /// Build a model without a feature extractor. Prediction over record
    /// pairs needs an extractor; feature-vector scoring does not.
    pub fn new(config: ClassifierConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            config,
            extractor: None,
            state: RwLock::new(None),
            metadata: RwLock::new(ModelMetadata {
                name: MODEL_TYPE.to_string(),
                version: WEIGHTS_SCHEMA_VERSION.to_string(),
                trained_at: None,
                accuracy: None,
                training_examples: None,
                feature_names: Vec::new(),
            }),
        })
    }

    /// Build a model with an attached feature extractor.
    pub fn with_extractor(
        config: ClassifierConfig,
        extractor: Arc<FeatureExtractor>,
    ) -> Result<Self, ModelError> {
        let model = Self::new(config)?;
        model.write_metadata().feature_names = extractor.feature_names().to_vec();
        Ok(Self {
            extractor: Some(extractor),
            ..model
        })
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, Option<ModelState>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, Option<ModelState>> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metadata(&self) -> std::sync::RwLockWriteGuard<'_, ModelMetadata> {
        self.metadata
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn expected_feature_count(&self) -> Option<usize> {
        self.extractor.as_ref().map(|e| e.feature_count())
    }

    fn feature_names_for(&self, count: usize) -> Vec<String> {
        match &self.extractor {
            Some(extractor) => extractor.feature_names().to_vec(),
            None => (0..count).map(|i| format!("feature_{i}")).collect(),
        }
    }

    /// Score an already-extracted feature vector.
    pub fn predict_from_features(
        &self,
        features: &FeatureVector,
    ) -> Result<MlPrediction, ModelError> {
        let guard = self.read_state();
        let state = guard.as_ref().ok_or(ModelError::NotReady)?;
        if state.weights.len() != features.values.len() {
            return Err(ModelError::InvalidWeights(format!(
                "feature count {} does not match weight count {}",
                features.values.len(),
                state.weights.len()
            )));
        }

        let p = probability(&state.weights, state.bias, &features.values);
        let classification = classify(p, &self.config);
        let feature_importance = self.config.include_feature_importance.then(|| {
            features
                .names
                .iter()
                .zip(&features.values)
                .zip(&state.weights)
                .map(|((name, value), weight)| {
                    let contribution = value * weight;
                    FeatureImportance {
                        name: name.clone(),
                        value: *value,
                        weight: *weight,
                        contribution,
                        importance: contribution.abs(),
                    }
                })
                .collect()
        });

        Ok(MlPrediction {
            probability: p,
            classification,
            confidence: confidence(p, classification, &self.config),
            features: features.clone(),
            feature_importance,
        })
    }

    /// Score a slice of feature vectors. Output order matches input order.
    pub fn predict_batch_from_features(
        &self,
        vectors: &[FeatureVector],
    ) -> Result<Vec<MlPrediction>, ModelError> {
        vectors
            .iter()
            .map(|vector| self.predict_from_features(vector))
            .collect()
    }

    /// Set weights and bias directly, marking the model ready.
    pub fn set_weights_and_bias(&self, weights: Vec<f64>, bias: f64) -> Result<(), ModelError> {
        validate_weight_values(&weights, bias)?;
        if let Some(expected) = self.expected_feature_count() {
            if weights.len() != expected {
                return Err(ModelError::InvalidWeights(format!(
                    "weight count {} does not match the attached extractor's {} features",
                    weights.len(),
                    expected
                )));
            }
        }
        let names = self.feature_names_for(weights.len());
        *self.write_state() = Some(ModelState { weights, bias });
        self.write_metadata().feature_names = names;
        Ok(())
    }

    /// Initialize weights with Xavier-style scale `sqrt(2 / count)` drawn
    /// from the supplied generator, and a zero bias.
    ///
    /// The generator is threaded explicitly so reproducibility never depends
    /// on hidden global state.
    pub fn initialize_weights(
        &self,
        count: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<(), ModelError> {
        if count == 0 {
            return Err(ModelError::InvalidWeights(
                "cannot initialize a model with zero features".into(),
            ));
        }
        if let Some(expected) = self.expected_feature_count() {
            if count != expected {
                return Err(ModelError::InvalidWeights(format!(
                    "initialization count {count} does not match the attached extractor's {expected} features"
                )));
            }
        }
        let scale = (2.0 / count as f64).sqrt();
        let weights = (0..count)
            .map(|_| (rng.f64() * 2.0 - 1.0) * scale)
            .collect();
        self.set_weights_and_bias(weights, 0.0)
    }

    /// Apply one gradient-descent step: `w -= lr * dw`, `b -= lr * db`.
    pub fn update_weights(
        &self,
        gradients: &[f64],
        bias_gradient: f64,
        learning_rate: f64,
    ) -> Result<(), ModelError> {
        let mut guard = self.write_state();
        let state = guard.as_mut().ok_or(ModelError::NotReady)?;
        if gradients.len() != state.weights.len() {
            return Err(ModelError::InvalidWeights(format!(
                "gradient count {} does not match weight count {}",
                gradients.len(),
                state.weights.len()
            )));
        }
        for (weight, gradient) in state.weights.iter_mut().zip(gradients) {
            *weight -= learning_rate * gradient;
        }
        state.bias -= learning_rate * bias_gradient;
        Ok(())
    }

    /// Current weights as an owned copy, if ready.
    pub fn weights(&self) -> Option<Vec<f64>> {
        self.read_state().as_ref().map(|s| s.weights.clone())
    }

    /// Current bias, if ready.
    pub fn bias(&self) -> Option<f64> {
        self.read_state().as_ref().map(|s| s.bias)
    }

    /// Stamp training provenance onto the metadata.
    pub fn set_provenance(
        &self,
        trained_at: Option<DateTime<Utc>>,
        accuracy: Option<f64>,
        training_examples: Option<usize>,
    ) {
        let mut metadata = self.write_metadata();
        metadata.trained_at = trained_at;
        metadata.accuracy = accuracy;
        metadata.training_examples = training_examples;
    }
}

fn validate_weight_values(weights: &[f64], bias: f64) -> Result<(), ModelError> {
    if weights.is_empty() {
        return Err(ModelError::InvalidWeights("weights must not be empty".into()));
    }
    for (index, weight) in weights.iter().enumerate() {
        if !weight.is_finite() {
            return Err(ModelError::InvalidWeights(format!(
                "weight at index {index} is not finite: {weight}"
            )));
        }
    }
    if !bias.is_finite() {
        return Err(ModelError::InvalidWeights(format!(
            "bias is not finite: {bias}"
        )));
    }
    Ok(())
}

#[async_trait]
impl MatchModel for LogisticModel {
    async fn predict(&self, pair: &RecordPair) -> Result<MlPrediction, ModelError> {
        let features = self.extract_features(pair)?;
        self.predict_from_features(&features)
    }

    async fn predict_batch(&self, pairs: &[RecordPair]) -> Result<Vec<MlPrediction>, ModelError> {
        let extractor = self.extractor.as_ref().ok_or(ModelError::MissingExtractor)?;
        if !self.is_ready() {
            return Err(ModelError::NotReady);
        }
        let mut predictions = Vec::with_capacity(pairs.len());
        for chunk in pairs.chunks(self.config.batch_size) {
            let vectors = extractor.extract_batch(chunk)?;
            predictions.extend(self.predict_batch_from_features(&vectors)?);
        }
        Ok(predictions)
    }

    fn extract_features(&self, pair: &RecordPair) -> Result<FeatureVector, ModelError> {
        let extractor = self.extractor.as_ref().ok_or(ModelError::MissingExtractor)?;
        Ok(extractor.extract(pair)?)
    }

    fn load_weights(&self, serialized: &SerializedWeights) -> Result<(), ModelError> {
        // Validation runs to completion before any state is touched.
        if serialized.model_type != MODEL_TYPE {
            return Err(ModelError::InvalidWeights(format!(
                "model type '{}' does not match expected '{}'",
                serialized.model_type, MODEL_TYPE
            )));
        }
        validate_weight_values(&serialized.weights, serialized.bias)?;
        if serialized.feature_names.len() != serialized.weights.len() {
            return Err(ModelError::InvalidWeights(format!(
                "featureNames length {} does not match weights length {}",
                serialized.feature_names.len(),
                serialized.weights.len()
            )));
        }
        if let Some(expected) = self.expected_feature_count() {
            if serialized.weights.len() != expected {
                return Err(ModelError::InvalidWeights(format!(
                    "weight count {} does not match the attached extractor's {} features",
                    serialized.weights.len(),
                    expected
                )));
            }
        }

        *self.write_state() = Some(ModelState {
            weights: serialized.weights.clone(),
            bias: serialized.bias,
        });
        let mut metadata = self.write_metadata();
        metadata.version = serialized.version.clone();
        metadata.feature_names = serialized.feature_names.clone();
        let extra = serialized.extra.as_ref();
        metadata.trained_at = extra.and_then(|e| e.trained_at);
        metadata.accuracy = extra.and_then(|e| e.accuracy);
        metadata.training_examples = extra.and_then(|e| e.training_examples);
        debug!(weights = serialized.weights.len(), "weights loaded");
        Ok(())
    }

    fn export_weights(&self) -> Result<SerializedWeights, ModelError> {
        let guard = self.read_state();
        let state = guard.as_ref().ok_or(ModelError::NotReady)?;
        let metadata = self
            .metadata
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let extra = if metadata.trained_at.is_some()
            || metadata.accuracy.is_some()
            || metadata.training_examples.is_some()
        {
            Some(WeightsExtra {
                trained_at: metadata.trained_at,
                accuracy: metadata.accuracy,
                training_examples: metadata.training_examples,
            })
        } else {
            None
        };
        Ok(SerializedWeights {
            model_type: MODEL_TYPE.to_string(),
            version: metadata.version.clone(),
            weights: state.weights.clone(),
            bias: state.bias,
            feature_names: metadata.feature_names.clone(),
            extra,
        })
    }

    fn is_ready(&self) -> bool {
        self.read_state().is_some()
    }

    fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn metadata(&self) -> ModelMetadata {
        self.metadata
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
