use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use features::{FeatureExtractor, FeatureVector};
use model::{probability, ClassifierConfig, LogisticModel, ModelError};

use crate::config::TrainingConfig;
use crate::dataset::TrainingDataset;
use crate::error::TrainerError;
use crate::types::{IterationMetrics, TrainingProgress, TrainingResult};

/// Observer invoked every `progress_interval` iterations.
pub type ProgressCallback = Arc<dyn Fn(&TrainingProgress) + Send + Sync>;

/// Salt separating the weight-initialization generator stream from the
/// shuffle stream, so reproducibility never depends on call order.
const INIT_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Probabilities are clamped into `[EPSILON, 1 - EPSILON]` inside the log
/// terms of the loss. Gradients use the unclamped error.
const PROB_EPSILON: f64 = 1e-15;

/// Supervised trainer: full-batch gradient descent over L2-regularized
/// binary cross-entropy.
///
/// A run deterministically shuffles the dataset with a seeded generator,
/// splits off a validation set, extracts every feature vector once, and then
/// iterates: forward pass, metrics, early-stopping check, descent step.
/// For a fixed [`TrainingConfig::seed`] two independent runs over the same
/// dataset produce identical trajectories and final weights.
///
/// Training failures never surface as `Err`: [`Trainer::train`] always
/// returns a [`TrainingResult`], with `success == false` and an error
/// message on any dataset, configuration, or extraction problem.
pub struct Trainer {
    extractor: Option<Arc<FeatureExtractor>>,
    config: TrainingConfig,
    progress: Option<ProgressCallback>,
}

impl Trainer {
    /// A trainer with no feature extractor; `train` reports a failure
    /// result until one is provided.
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            extractor: None,
            config,
            progress: None,
        }
    }

    /// A trainer bound to a feature extractor.
    pub fn with_extractor(extractor: Arc<FeatureExtractor>, config: TrainingConfig) -> Self {
        Self {
            extractor: Some(extractor),
            config,
            progress: None,
        }
    }

    /// Install a progress observer.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run training and return the result object. Never returns an error;
    /// inspect [`TrainingResult::success`].
    pub fn train(&self, dataset: &TrainingDataset) -> TrainingResult {
        let started = Instant::now();
        let outcome = LogisticModel::new(ClassifierConfig::default())
            .map_err(TrainerError::from)
            .and_then(|model| self.run_on_model(&model, dataset, &started));
        match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "training failed");
                TrainingResult::failure(err.to_string(), elapsed_ms(&started))
            }
        }
    }

    /// Train and return a classifier holding the final weights alongside the
    /// result.
    ///
    /// Only an invalid `classifier_config` is an `Err` (a configuration
    /// error the caller must fix); training failures are reported through
    /// the result, in which case the returned model holds no trained
    /// weights.
    pub fn train_classifier(
        &self,
        dataset: &TrainingDataset,
        classifier_config: ClassifierConfig,
    ) -> Result<(LogisticModel, TrainingResult), ModelError> {
        let model = match &self.extractor {
            Some(extractor) => {
                LogisticModel::with_extractor(classifier_config, Arc::clone(extractor))?
            }
            None => LogisticModel::new(classifier_config)?,
        };
        let started = Instant::now();
        let result = match self.run_on_model(&model, dataset, &started) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "training failed");
                TrainingResult::failure(err.to_string(), elapsed_ms(&started))
            }
        };
        if result.success {
            let accuracy = result
                .final_metrics
                .as_ref()
                .map(|m| m.val_accuracy.unwrap_or(m.accuracy));
            model.set_provenance(Some(Utc::now()), accuracy, Some(dataset.len()));
        }
        Ok((model, result))
    }

    fn run_on_model(
        &self,
        model: &LogisticModel,
        dataset: &TrainingDataset,
        started: &Instant,
    ) -> Result<TrainingResult, TrainerError> {
        self.config.validate()?;
        if dataset.is_empty() {
            return Err(TrainerError::EmptyDataset);
        }
        let extractor = self
            .extractor
            .as_ref()
            .ok_or(TrainerError::MissingExtractor)?;

        // Two independent generator streams derived from the same seed:
        // shuffling and initialization stay reproducible regardless of how
        // many draws either one makes.
        let (mut shuffle_rng, mut init_rng) = match self.config.seed {
            Some(seed) => (
                fastrand::Rng::with_seed(seed),
                fastrand::Rng::with_seed(seed ^ INIT_STREAM_SALT),
            ),
            None => (fastrand::Rng::new(), fastrand::Rng::new()),
        };

        let mut order: Vec<usize> = (0..dataset.len()).collect();
        shuffle_rng.shuffle(&mut order);

        let examples = dataset.examples();
        let mut vectors = Vec::with_capacity(order.len());
        let mut targets = Vec::with_capacity(order.len());
        for &index in &order {
            let example = &examples[index];
            vectors.push(extractor.extract(&example.pair)?);
            targets.push(example.label.target());
        }

        let val_count = (order.len() as f64 * self.config.validation_split).floor() as usize;
        let train_count = order.len() - val_count;
        let (train_x, val_x) = vectors.split_at(train_count);
        let (train_y, val_y) = targets.split_at(train_count);
        debug!(
            train = train_count,
            validation = val_count,
            features = extractor.feature_count(),
            "training split prepared"
        );

        let feature_count = extractor.feature_count();
        model.initialize_weights(feature_count, &mut init_rng)?;

        let mut history: Vec<IterationMetrics> = Vec::new();
        let mut best_val_loss = f64::INFINITY;
        let mut patience = 0u32;
        let mut early_stopped = false;

        for iteration in 0..self.config.max_iterations {
            let weights = model.weights().ok_or(ModelError::NotReady)?;
            let bias = model.bias().ok_or(ModelError::NotReady)?;

            let pass = forward_pass(&weights, bias, train_x, train_y, self.config.regularization);
            let (gradients, bias_gradient) = batch_gradients(
                &weights,
                &pass.probabilities,
                train_x,
                train_y,
                self.config.regularization,
            );

            let (val_loss, val_accuracy) = if val_count > 0 {
                let val_pass =
                    forward_pass(&weights, bias, val_x, val_y, self.config.regularization);
                (Some(val_pass.loss), Some(val_pass.accuracy))
            } else {
                (None, None)
            };

            let metrics = IterationMetrics {
                iteration,
                loss: pass.loss,
                accuracy: pass.accuracy,
                val_loss,
                val_accuracy,
            };
            debug!(
                iteration,
                loss = metrics.loss,
                accuracy = metrics.accuracy,
                "iteration recorded"
            );
            history.push(metrics);

            if let Some(callback) = &self.progress {
                if iteration % self.config.progress_interval == 0 {
                    callback(&TrainingProgress {
                        iteration,
                        max_iterations: self.config.max_iterations,
                        loss: pass.loss,
                        accuracy: pass.accuracy,
                        val_loss,
                        val_accuracy,
                    });
                }
            }

            if let Some(val_loss) = val_loss {
                if val_loss < best_val_loss - self.config.min_improvement {
                    best_val_loss = val_loss;
                    patience = 0;
                } else {
                    patience += 1;
                }
                if patience >= self.config.early_stopping_patience {
                    early_stopped = true;
                    break;
                }
            }

            model.update_weights(&gradients, bias_gradient, self.config.learning_rate)?;
        }

        let final_metrics = history.last().cloned();
        info!(
            iterations = history.len(),
            early_stopped, "training complete"
        );
        Ok(TrainingResult {
            success: true,
            weights: model.weights(),
            bias: model.bias(),
            final_metrics,
            history,
            training_time_ms: elapsed_ms(started),
            early_stopped,
            error: None,
        })
    }
}

fn elapsed_ms(started: &Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

struct ForwardPass {
    probabilities: Vec<f64>,
    loss: f64,
    accuracy: f64,
}

fn forward_pass(
    weights: &[f64],
    bias: f64,
    vectors: &[FeatureVector],
    targets: &[f64],
    regularization: f64,
) -> ForwardPass {
    let probabilities: Vec<f64> = vectors
        .iter()
        .map(|vector| probability(weights, bias, &vector.values))
        .collect();

    let count = targets.len().max(1) as f64;
    let mut loss_sum = 0.0;
    let mut correct = 0usize;
    for (p, y) in probabilities.iter().zip(targets) {
        let clamped = p.clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
        loss_sum += -y * clamped.ln() - (1.0 - y) * (1.0 - clamped).ln();
        if (*p >= 0.5) == (*y >= 0.5) {
            correct += 1;
        }
    }
    let penalty = regularization / 2.0 * weights.iter().map(|w| w * w).sum::<f64>();

    ForwardPass {
        probabilities,
        loss: loss_sum / count + penalty,
        accuracy: correct as f64 / count,
    }
}

fn batch_gradients(
    weights: &[f64],
    probabilities: &[f64],
    vectors: &[FeatureVector],
    targets: &[f64],
    regularization: f64,
) -> (Vec<f64>, f64) {
    let count = targets.len().max(1) as f64;
    let mut gradients = vec![0.0; weights.len()];
    let mut bias_gradient = 0.0;
    for ((vector, p), y) in vectors.iter().zip(probabilities).zip(targets) {
        let error = p - y;
        bias_gradient += error;
        for (gradient, x) in gradients.iter_mut().zip(&vector.values) {
            *gradient += error * x;
        }
    }
    for (gradient, weight) in gradients.iter_mut().zip(weights) {
        *gradient = *gradient / count + regularization * weight;
    }
    (gradients, bias_gradient / count)
}
