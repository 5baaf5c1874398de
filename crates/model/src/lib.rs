//! # Identity-Resolution Match Model (`model`)
//!
//! ## Purpose
//!
//! `model` sits on top of the feature extraction layer (`features`) and
//! scores record pairs with a trainable logistic-regression classifier:
//! `probability = sigmoid(weights . features + bias)`, classified into
//! match / non-match / uncertain via two thresholds, with a
//! distance-to-threshold confidence and an optional per-feature importance
//! breakdown.
//!
//! ## Core Types
//!
//! - [`MatchModel`]: the capability interface — async `predict` /
//!   `predict_batch`, feature extraction, weight import/export, readiness,
//!   config and metadata accessors. Asynchronous by contract so an
//!   implementation may live behind a remote service.
//! - [`LogisticModel`]: the reference implementation; pure computation,
//!   state behind an `RwLock`, accessors returning defensive copies.
//! - [`SerializedWeights`]: the only persisted artifact; loading is
//!   validated all-or-nothing so a rejected artifact never corrupts a
//!   working model.
//! - [`ClassifierConfig`]: thresholds, batch sizing, importance toggle.
//!
//! ## Lifecycle
//!
//! A model is "not ready" until weights exist (training, manual assignment,
//! or a successful load); `predict` and `export_weights` on a not-ready
//! model return [`ModelError::NotReady`].
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
//! use model::{ClassifierConfig, LogisticModel, MatchModel};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let config = FeatureConfig::with_fields(vec![
//!     FieldFeatureConfig::new("name", vec![ExtractorKind::Exact]),
//! ]);
//! let extractor = Arc::new(FeatureExtractor::new(config, Arc::new(StubComparators)).unwrap());
//!
//! let model = LogisticModel::with_extractor(ClassifierConfig::default(), extractor).unwrap();
//! model.set_weights_and_bias(vec![6.0, -6.0], -3.0).unwrap();
//!
//! let pair = RecordPair::new(json!({"name": "ada"}), json!({"name": "ada"}));
//! let prediction = model.predict(&pair).await.unwrap();
//! assert!(prediction.probability > 0.9);
//! # });
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod score;
pub mod types;

pub use crate::classifier::{LogisticModel, MatchModel, MODEL_TYPE, WEIGHTS_SCHEMA_VERSION};
pub use crate::config::ClassifierConfig;
pub use crate::error::ModelError;
pub use crate::score::{classify, confidence, probability, sigmoid, LOGIT_CLAMP};
pub use crate::types::{
    FeatureImportance, MlPrediction, ModelMetadata, SerializedWeights, WeightsExtra,
};
