//! # Identity-Resolution Feature Extraction (`features`)
//!
//! ## Purpose
//!
//! `features` is the lowest layer of the identity-resolution matching stack.
//! It turns a pair of records (arbitrary JSON documents) into a fixed-length
//! numeric feature vector describing how similar the two records are along
//! configured dimensions, ready for scoring by the model layer.
//!
//! ## Contract
//!
//! - Extraction is a pure function of `(record_pair, config, comparators)`
//!   with no I/O and no reliance on clocks or global process state.
//! - Feature names are generated once at construction, in
//!   field-then-extractor order, and never recomputed per call.
//! - Every configuration problem is rejected at [`FeatureExtractor`]
//!   construction, before any extraction runs.
//!
//! Invariant: for every produced [`FeatureVector`],
//! `values.len() == names.len()`, and with `normalize` enabled every value
//! lies in `[0.0, 1.0]`.
//!
//! ## Core Types
//!
//! - [`FeatureConfig`] / [`FieldFeatureConfig`]: ordered per-field plans of
//!   [`ExtractorKind`]s, weights, and missing-indicator settings.
//! - [`Comparators`]: the string-similarity collaborator seam
//!   ([`DefaultComparators`] for production, [`StubComparators`] for tests).
//! - [`FeatureExtractor`]: the engine; also accepts named
//!   [`CustomExtractorFn`] registrations.
//! - [`RecordPair`] / [`FeatureVector`] / [`MatchLabel`]: the data model
//!   shared with downstream stages.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use features::{
//!     DefaultComparators, ExtractorKind, FeatureConfig, FeatureExtractor,
//!     FieldFeatureConfig, RecordPair,
//! };
//!
//! let config = FeatureConfig::with_fields(vec![
//!     FieldFeatureConfig::new("name", vec![ExtractorKind::JaroWinkler]),
//!     FieldFeatureConfig::new("birth_date", vec![ExtractorKind::DateDiff]),
//! ]);
//! let extractor = FeatureExtractor::new(config, Arc::new(DefaultComparators)).unwrap();
//!
//! let pair = RecordPair::new(
//!     json!({"name": "Jon Smith", "birth_date": "1984-03-01"}),
//!     json!({"name": "John Smith", "birth_date": "1984-03-01"}),
//! );
//! let vector = extractor.extract(&pair).unwrap();
//! assert_eq!(vector.values.len(), extractor.feature_count());
//! ```

pub mod comparators;
pub mod config;
pub mod error;
pub mod extract;
pub mod path;
pub mod types;

pub use crate::comparators::{missing_rule, Comparators, DefaultComparators, StubComparators};
pub use crate::config::{ExtractorKind, FeatureConfig, FieldFeatureConfig};
pub use crate::error::FeatureError;
pub use crate::extract::{CustomExtractorFn, FeatureExtractor};
pub use crate::path::resolve_path;
pub use crate::types::{FeatureVector, MatchLabel, RecordPair};

/// Current feature-vector schema version for this crate.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;
