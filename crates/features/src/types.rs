//! Core data model types for the feature extraction crate.
//!
//! These types represent the shape of record-pair comparisons and the numeric
//! vectors that flow to downstream model stages. They are designed to be:
//!
//! - **Serializable**: JSON support via serde for configs and artifacts
//! - **Cloneable**: cheap to clone for pipeline processing
//! - **Comparable**: equality checks for testing

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Ternary match decision shared between labeled examples and classifier
/// output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchLabel {
    /// The two records describe the same real-world entity.
    Match,
    /// The two records describe different entities.
    NonMatch,
    /// The comparison is inconclusive and needs review.
    Uncertain,
}

/// A pair of records under comparison.
///
/// Records are arbitrary JSON documents; field access uses dotted paths
/// resolved by the extractor. Pairs are ephemeral — one is created per
/// comparison and dropped afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordPair {
    pub record1: JsonValue,
    pub record2: JsonValue,
    /// Ground-truth label when the pair comes from labeled data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<MatchLabel>,
}

impl RecordPair {
    /// Build an unlabeled pair.
    pub fn new(record1: JsonValue, record2: JsonValue) -> Self {
        Self {
            record1,
            record2,
            label: None,
        }
    }

    /// Build a labeled pair.
    pub fn labeled(record1: JsonValue, record2: JsonValue, label: MatchLabel) -> Self {
        Self {
            record1,
            record2,
            label: Some(label),
        }
    }
}

/// Fixed-length numeric encoding of how similar two records are along the
/// configured dimensions.
///
/// Invariant: `values.len() == names.len()`, with entries in the same order.
/// When normalization is enabled every value lies in `[0.0, 1.0]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    pub values: Vec<f64>,
    pub names: Vec<String>,
    /// Optional opaque annotations attached by callers (never read by the
    /// extractor itself).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn labels_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&MatchLabel::NonMatch).unwrap(),
            "\"non_match\""
        );
        assert_eq!(
            serde_json::from_str::<MatchLabel>("\"uncertain\"").unwrap(),
            MatchLabel::Uncertain
        );
    }

    #[test]
    fn record_pair_roundtrips() {
        let pair = RecordPair::labeled(
            json!({"name": "Ada"}),
            json!({"name": "Ada L."}),
            MatchLabel::Match,
        );
        let text = serde_json::to_string(&pair).unwrap();
        let back: RecordPair = serde_json::from_str(&text).unwrap();
        assert_eq!(pair, back);
    }

    #[test]
    fn unlabeled_pair_omits_label_field() {
        let pair = RecordPair::new(json!({}), json!({}));
        let text = serde_json::to_string(&pair).unwrap();
        assert!(!text.contains("label"));
    }
}
