//! Labeled training data for the match model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use features::RecordPair;

/// Binary supervision label. Unlike the ternary comparison outcome, training
/// examples are never "uncertain" — inconclusive pairs stay in the review
/// queue until a human decides.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExampleLabel {
    Match,
    NonMatch,
}

impl ExampleLabel {
    /// Regression target for the loss: 1.0 for a match, 0.0 otherwise.
    pub fn target(&self) -> f64 {
        match self {
            ExampleLabel::Match => 1.0,
            ExampleLabel::NonMatch => 0.0,
        }
    }
}

/// One labeled record pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingExample {
    pub pair: RecordPair,
    pub label: ExampleLabel,
    /// Where the label came from (e.g. `"review-queue"`, `"seed-data"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrainingExample {
    pub fn new(pair: RecordPair, label: ExampleLabel) -> Self {
        Self {
            pair,
            label,
            source: None,
            timestamp: None,
        }
    }
}

/// Derived dataset statistics. Counts are computed from the examples and
/// cannot be set independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetMetadata {
    pub match_count: usize,
    pub non_match_count: usize,
}

/// An ordered collection of labeled examples.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrainingDataset {
    examples: Vec<TrainingExample>,
}

impl TrainingDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_examples(examples: Vec<TrainingExample>) -> Self {
        Self { examples }
    }

    pub fn push(&mut self, example: TrainingExample) {
        self.examples.push(example);
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.examples
            .iter()
            .filter(|e| e.label == ExampleLabel::Match)
            .count()
    }

    pub fn non_match_count(&self) -> usize {
        self.examples
            .iter()
            .filter(|e| e.label == ExampleLabel::NonMatch)
            .count()
    }

    pub fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata {
            match_count: self.match_count(),
            non_match_count: self.non_match_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example(label: ExampleLabel) -> TrainingExample {
        TrainingExample::new(
            RecordPair::new(json!({"name": "a"}), json!({"name": "b"})),
            label,
        )
    }

    #[test]
    fn counts_are_derived_from_examples() {
        let mut dataset = TrainingDataset::new();
        assert!(dataset.is_empty());

        dataset.push(example(ExampleLabel::Match));
        dataset.push(example(ExampleLabel::Match));
        dataset.push(example(ExampleLabel::NonMatch));

        let metadata = dataset.metadata();
        assert_eq!(metadata.match_count, 2);
        assert_eq!(metadata.non_match_count, 1);
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn targets_map_to_unit_interval_endpoints() {
        assert_eq!(ExampleLabel::Match.target(), 1.0);
        assert_eq!(ExampleLabel::NonMatch.target(), 0.0);
    }

    #[test]
    fn labels_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&ExampleLabel::NonMatch).unwrap(),
            "\"non_match\""
        );
    }
}
