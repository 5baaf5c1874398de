use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value as JsonValue;
use tokio::time::timeout;
use tracing::{debug, warn};

use features::RecordPair;
use model::{MatchModel, MlPrediction};

use crate::config::{ApplyTo, IntegrationConfig, IntegrationMode, OutcomeThresholds};
use crate::error::IntegrateError;
use crate::metrics::metrics_recorder;
use crate::types::{
    BatchEnhanceOutcome, BatchStats, DeterministicMatch, EnhancedMatch, MatchOutcome, MatchScore,
    MlMatchDecision,
};


/// Blends ML predictions with prior deterministic match results.
///
/// The integrator owns a shared [`MatchModel`] handle and a validated
/// [`IntegrationConfig`]. Every prediction is raced against the configured
/// timeout; on timeout the prediction future is dropped, so an in-process
/// prediction cannot outlive the call (a remote [`MatchModel`]
/// implementation must tolerate cancellation at any await point).
pub struct ScoreIntegrator {
    model: Arc<dyn MatchModel>,
    config: IntegrationConfig,
}

impl ScoreIntegrator {
    /// Construct an integrator, validating the configuration up front.
    pub fn new(
        model: Arc<dyn MatchModel>,
        config: IntegrationConfig,
    ) -> Result<Self, IntegrateError> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Enhance a single deterministic result with the configured strategy.
    ///
    /// On a prediction timeout or error with `fallback_on_error` enabled,
    /// the prior score is preserved unmodified and the error message is
    /// recorded on the result; otherwise the error propagates.
    pub async fn enhance_match_result(
        &self,
        candidate: &JsonValue,
        existing: &JsonValue,
        prior: &DeterministicMatch,
    ) -> Result<EnhancedMatch, IntegrateError> {
        self.enhance_match_result_with(candidate, existing, prior, &self.config)
            .await
    }

    /// Variant of [`Self::enhance_match_result`] with an explicit per-call
    /// configuration.
    pub async fn enhance_match_result_with(
        &self,
        candidate: &JsonValue,
        existing: &JsonValue,
        prior: &DeterministicMatch,
        config: &IntegrationConfig,
    ) -> Result<EnhancedMatch, IntegrateError> {
        config.validate()?;
        let started = Instant::now();
        let result = self.enhance_one(candidate, existing, prior, config).await;
        if let Ok(enhanced) = &result {
            if let Some(recorder) = metrics_recorder() {
                recorder.record_enhance(&config.mode, started.elapsed(), enhanced.ml_used);
            }
        }
        result
    }

    /// Enhance one candidate list, re-sorted descending by final
    /// `total_score`.
    ///
    /// Predictions run through the model's batch API inside a single timeout
    /// window. Output order matches input order until the final sort, which
    /// is the only reordering step; ties keep their relative order.
    pub async fn enhance_match_results(
        &self,
        candidate: &JsonValue,
        existing: &[JsonValue],
        priors: &[DeterministicMatch],
    ) -> Result<Vec<EnhancedMatch>, IntegrateError> {
        let (results, _prediction_ms) = self
            .enhance_batch_inner(candidate, existing, priors, &self.config)
            .await?;
        Ok(results)
    }

    /// Like [`Self::enhance_match_results`], additionally returning
    /// aggregate statistics for the batch.
    pub async fn enhance_match_results_batch(
        &self,
        candidate: &JsonValue,
        existing: &[JsonValue],
        priors: &[DeterministicMatch],
    ) -> Result<BatchEnhanceOutcome, IntegrateError> {
        let (results, prediction_ms) = self
            .enhance_batch_inner(candidate, existing, priors, &self.config)
            .await?;
        let stats = BatchStats {
            total: results.len(),
            ml_used: results.iter().filter(|r| r.ml_used).count(),
            ml_time_ms: prediction_ms,
        };
        Ok(BatchEnhanceOutcome { results, stats })
    }

    /// Pure ML decision path against externally supplied thresholds.
    ///
    /// Never falls back: any prediction failure propagates as
    /// [`IntegrateError::Prediction`] naming the underlying cause.
    pub async fn match_with_ml_only(
        &self,
        candidate: &JsonValue,
        existing: &JsonValue,
        thresholds: &OutcomeThresholds,
    ) -> Result<MlMatchDecision, IntegrateError> {
        thresholds.validate()?;
        let pair = RecordPair::new(candidate.clone(), existing.clone());
        let prediction = self
            .model
            .predict(&pair)
            .await
            .map_err(|err| IntegrateError::Prediction(err.to_string()))?;
        let outcome = thresholds.classify(prediction.probability);
        Ok(MlMatchDecision {
            outcome,
            probability: prediction.probability,
            confidence: prediction.confidence,
            explanation: format!(
                "ML prediction: probability {:.4} (confidence {:.4}) classified as {outcome}",
                prediction.probability, prediction.confidence
            ),
        })
    }

    async fn enhance_one(
        &self,
        candidate: &JsonValue,
        existing: &JsonValue,
        prior: &DeterministicMatch,
        config: &IntegrationConfig,
    ) -> Result<EnhancedMatch, IntegrateError> {
        if skipped_by_apply_gate(config, prior) {
            debug!("prior outcome is a definite match; skipping ML enhancement");
            return Ok(EnhancedMatch::passthrough(prior));
        }

        let pair = RecordPair::new(candidate.clone(), existing.clone());
        let started = Instant::now();
        match self.predict_with_timeout(&pair, config.timeout_ms).await {
            Ok(prediction) => {
                let elapsed = elapsed_ms(&started);
                if attached_only(config, prior) {
                    // Fallback mode on a definite match: the prediction is
                    // kept for reference but the score stays deterministic.
                    let mut enhanced = EnhancedMatch::passthrough(prior);
                    enhanced.ml_prediction = Some(prediction);
                    enhanced.ml_time_ms = Some(elapsed);
                    Ok(enhanced)
                } else {
                    Ok(apply_prediction(prior, prediction, Some(elapsed), config))
                }
            }
            Err(err) if config.fallback_on_error => {
                warn!(error = %err, "ML prediction unavailable; preserving deterministic score");
                let mut enhanced = EnhancedMatch::passthrough(prior);
                enhanced.ml_error = Some(err.to_string());
                Ok(enhanced)
            }
            Err(err) => Err(err),
        }
    }

    async fn enhance_batch_inner(
        &self,
        candidate: &JsonValue,
        existing: &[JsonValue],
        priors: &[DeterministicMatch],
        config: &IntegrationConfig,
    ) -> Result<(Vec<EnhancedMatch>, u64), IntegrateError> {
        config.validate()?;
        if existing.len() != priors.len() {
            return Err(IntegrateError::InvalidConfig(format!(
                "existing record count {} does not match prior result count {}",
                existing.len(),
                priors.len()
            )));
        }
        let started = Instant::now();

        let pairs: Vec<RecordPair> = existing
            .iter()
            .map(|record| RecordPair::new(candidate.clone(), record.clone()))
            .collect();

        let prediction_started = Instant::now();
        let outcome = match timeout(
            Duration::from_millis(config.timeout_ms),
            self.model.predict_batch(&pairs),
        )
        .await
        {
            Ok(Ok(predictions)) => Ok(predictions),
            Ok(Err(err)) => Err(IntegrateError::Prediction(err.to_string())),
            Err(_) => Err(IntegrateError::Timeout {
                timeout_ms: config.timeout_ms,
            }),
        };
        let prediction_ms = elapsed_ms(&prediction_started);

        let mut results: Vec<EnhancedMatch> = match outcome {
            Ok(predictions) => {
                if predictions.len() != priors.len() {
                    return Err(IntegrateError::Prediction(format!(
                        "model returned {} predictions for {} candidates",
                        predictions.len(),
                        priors.len()
                    )));
                }
                // Still in input order here; the sort below is the only
                // reordering step.
                predictions
                    .into_iter()
                    .zip(priors)
                    .map(|(prediction, prior)| {
                        if skipped_by_apply_gate(config, prior) {
                            EnhancedMatch::passthrough(prior)
                        } else if attached_only(config, prior) {
                            let mut enhanced = EnhancedMatch::passthrough(prior);
                            enhanced.ml_prediction = Some(prediction);
                            enhanced
                        } else {
                            apply_prediction(prior, prediction, None, config)
                        }
                    })
                    .collect()
            }
            Err(err) if config.fallback_on_error => {
                warn!(error = %err, count = priors.len(), "batch prediction unavailable; preserving deterministic scores");
                priors
                    .iter()
                    .map(|prior| {
                        let mut enhanced = EnhancedMatch::passthrough(prior);
                        enhanced.ml_error = Some(err.to_string());
                        enhanced
                    })
                    .collect()
            }
            Err(err) => return Err(err),
        };

        results.sort_by(|a, b| {
            b.score
                .total_score
                .partial_cmp(&a.score.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(recorder) = metrics_recorder() {
            recorder.record_enhance(
                &config.mode,
                started.elapsed(),
                results.iter().any(|r| r.ml_used),
            );
        }
        Ok((results, prediction_ms))
    }

    /// Race one prediction against the configured timer. On timeout the
    /// prediction future is dropped (cancelled), closing the window where a
    /// losing task could outlive the call.
    async fn predict_with_timeout(
        &self,
        pair: &RecordPair,
        timeout_ms: u64,
    ) -> Result<MlPrediction, IntegrateError> {
        match timeout(Duration::from_millis(timeout_ms), self.model.predict(pair)).await {
            Ok(Ok(prediction)) => Ok(prediction),
            Ok(Err(err)) => Err(IntegrateError::Prediction(err.to_string())),
            Err(_) => Err(IntegrateError::Timeout { timeout_ms }),
        }
    }
}

/// `apply_to: uncertain_only` skips definite matches entirely, regardless
/// of mode.
fn skipped_by_apply_gate(config: &IntegrationConfig, prior: &DeterministicMatch) -> bool {
    config.apply_to == ApplyTo::UncertainOnly && prior.outcome == MatchOutcome::DefiniteMatch
}

/// In fallback mode a definite match keeps its deterministic score; the
/// prediction is computed and attached for reference only.
fn attached_only(config: &IntegrationConfig, prior: &DeterministicMatch) -> bool {
    config.mode == IntegrationMode::Fallback && prior.outcome == MatchOutcome::DefiniteMatch
}

fn apply_prediction(
    prior: &DeterministicMatch,
    prediction: MlPrediction,
    elapsed: Option<u64>,
    config: &IntegrationConfig,
) -> EnhancedMatch {
    let max_possible = prior.score.max_possible_score;
    let p = prediction.probability;

    let (normalized, ml_contribution, probabilistic_contribution) = match config.mode {
        IntegrationMode::Hybrid => {
            let ml_part = config.ml_weight * p;
            let prior_part = (1.0 - config.ml_weight) * prior.score.normalized_score;
            (
                ml_part + prior_part,
                Some(ml_part * max_possible),
                Some(prior_part * max_possible),
            )
        }
        // MlOnly, and fallback when it applies: ML replaces the score.
        IntegrationMode::MlOnly | IntegrationMode::Fallback => {
            (p, Some(p * max_possible), None)
        }
    };
    let outcome = config.thresholds.classify(normalized);

    EnhancedMatch {
        outcome,
        candidate_record: prior.candidate_record.clone(),
        score: MatchScore {
            total_score: normalized * max_possible,
            max_possible_score: max_possible,
            normalized_score: normalized,
            field_scores: prior.score.field_scores.clone(),
        },
        explanation: format!(
            "{}; ML probability {:.3} applied ({} mode)",
            prior.explanation, p, config.mode
        ),
        ml_used: true,
        ml_prediction: Some(prediction),
        ml_error: None,
        ml_score_contribution: ml_contribution,
        probabilistic_score_contribution: probabilistic_contribution,
        ml_time_ms: elapsed,
    }
}

fn elapsed_ms(started: &Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
