//! Workspace umbrella crate for ML-assisted identity resolution.
//!
//! This crate stitches the matching stack together so callers can go from a
//! labeled dataset to a ready score integrator with a single API entry
//! point:
//!
//! - `features` — turns a record pair into a numeric feature vector.
//! - `model` — scores feature vectors with a logistic-regression classifier.
//! - `trainer` — fits the classifier from labeled examples.
//! - `integrator` — blends classifier probabilities with prior
//!   deterministic match results under configurable strategies.
//!
//! Dependency order: `features` → `model` → {`trainer`, `integrator`}.
//! String-similarity primitives, the merge engine, the review queue, and
//! all persistence are external collaborators; this library only consumes
//! their interfaces.

pub use features::{
    missing_rule, Comparators, CustomExtractorFn, DefaultComparators, ExtractorKind,
    FeatureConfig, FeatureError, FeatureExtractor, FeatureVector, FieldFeatureConfig, MatchLabel,
    RecordPair, StubComparators, FEATURE_SCHEMA_VERSION,
};
pub use integrator::{
    set_integration_metrics, ApplyTo, BatchEnhanceOutcome, BatchStats, DeterministicMatch,
    EnhancedMatch, FieldScore, IntegrateError, IntegrationConfig, IntegrationMetrics,
    IntegrationMode, MatchOutcome, MatchScore, MlMatchDecision, OutcomeThresholds,
    ScoreIntegrator,
};
pub use model::{
    ClassifierConfig, FeatureImportance, LogisticModel, MatchModel, MlPrediction, ModelError,
    ModelMetadata, SerializedWeights, WeightsExtra, MODEL_TYPE, WEIGHTS_SCHEMA_VERSION,
};
pub use trainer::{
    DatasetMetadata, ExampleLabel, IterationMetrics, ProgressCallback, Trainer, TrainerError,
    TrainingConfig, TrainingDataset, TrainingExample, TrainingProgress, TrainingResult,
};

pub mod config;
pub use crate::config::{
    load_pipeline_config, parse_pipeline_config, ConfigLoadError, PipelineConfig,
};

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

/// Errors from the end-to-end pipeline helpers.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Training reported a failure result; the message is the result's
    /// error string.
    #[error("training failed: {0}")]
    Training(String),
    #[error("feature extraction failed: {0}")]
    Feature(#[from] FeatureError),
    #[error("model failure: {0}")]
    Model(#[from] ModelError),
    #[error("score integration failed: {0}")]
    Integrate(#[from] IntegrateError),
}

/// Build a feature extractor from a pipeline config, using the production
/// comparator set.
pub fn extractor_from_config(config: &PipelineConfig) -> Result<FeatureExtractor, PipelineError> {
    Ok(FeatureExtractor::new(
        config.features.clone(),
        Arc::new(DefaultComparators),
    )?)
}

/// Train a classifier on the dataset and wrap it in a ready
/// [`ScoreIntegrator`].
///
/// Training failures (empty dataset, extraction errors) surface as
/// [`PipelineError::Training`] carrying the result's error message; invalid
/// classifier or integration configuration surfaces as the corresponding
/// stage error.
pub fn train_integrator(
    extractor: Arc<FeatureExtractor>,
    dataset: &TrainingDataset,
    training_config: TrainingConfig,
    classifier_config: ClassifierConfig,
    integration_config: IntegrationConfig,
) -> Result<(ScoreIntegrator, TrainingResult), PipelineError> {
    let trainer = Trainer::with_extractor(extractor, training_config);
    let (classifier, result) = trainer.train_classifier(dataset, classifier_config)?;
    if !result.success {
        return Err(PipelineError::Training(
            result
                .error
                .clone()
                .unwrap_or_else(|| "training failed without an error message".into()),
        ));
    }
    info!(
        examples = dataset.len(),
        iterations = result.history.len(),
        "trained match classifier"
    );
    let integrator = ScoreIntegrator::new(Arc::new(classifier), integration_config)?;
    Ok((integrator, result))
}

/// Convenience wrapper: enhance a candidate list and return results plus
/// aggregate statistics.
pub async fn enhance_candidates(
    integrator: &ScoreIntegrator,
    candidate: &serde_json::Value,
    existing: &[serde_json::Value],
    priors: &[DeterministicMatch],
) -> Result<BatchEnhanceOutcome, PipelineError> {
    Ok(integrator
        .enhance_match_results_batch(candidate, existing, priors)
        .await?)
}
