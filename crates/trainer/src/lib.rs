//! # Identity-Resolution Model Training (`trainer`)
//!
//! ## Purpose
//!
//! `trainer` fits the logistic match model from labeled record pairs:
//! full-batch gradient descent over L2-regularized binary cross-entropy,
//! with seeded shuffling, a train/validation split, early stopping, and
//! per-iteration metrics history.
//!
//! ## Contract
//!
//! - Training is deterministic for a fixed [`TrainingConfig::seed`]: the
//!   shuffle and the weight initialization draw from two independent
//!   generator streams derived from that seed, so two runs over the same
//!   dataset produce bit-identical trajectories.
//! - [`Trainer::train`] never returns an error. Dataset, configuration, and
//!   extraction failures all surface as
//!   `TrainingResult { success: false, error: Some(..) }`, so batch training
//!   pipelines need no per-call error handling.
//! - Feature vectors are extracted once per example, before the loop.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use features::{
//!     ExtractorKind, FeatureConfig, FeatureExtractor, FieldFeatureConfig,
//!     RecordPair, StubComparators,
//! };
//! use trainer::{ExampleLabel, Trainer, TrainingConfig, TrainingDataset, TrainingExample};
//!
//! let config = FeatureConfig::with_fields(vec![
//!     FieldFeatureConfig::new("name", vec![ExtractorKind::Exact]),
//! ]);
//! let extractor = Arc::new(FeatureExtractor::new(config, Arc::new(StubComparators)).unwrap());
//!
//! let mut dataset = TrainingDataset::new();
//! dataset.push(TrainingExample::new(
//!     RecordPair::new(json!({"name": "ada"}), json!({"name": "ada"})),
//!     ExampleLabel::Match,
//! ));
//! dataset.push(TrainingExample::new(
//!     RecordPair::new(json!({"name": "ada"}), json!({"name": "grace"})),
//!     ExampleLabel::NonMatch,
//! ));
//!
//! let trainer = Trainer::with_extractor(extractor, TrainingConfig {
//!     seed: Some(7),
//!     validation_split: 0.0,
//!     ..TrainingConfig::default()
//! });
//! let result = trainer.train(&dataset);
//! assert!(result.success);
//! assert_eq!(result.weights.unwrap().len(), 2);
//! ```

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod types;

pub use crate::config::TrainingConfig;
pub use crate::dataset::{DatasetMetadata, ExampleLabel, TrainingDataset, TrainingExample};
pub use crate::engine::{ProgressCallback, Trainer};
pub use crate::error::TrainerError;
pub use crate::types::{IterationMetrics, TrainingProgress, TrainingResult};
