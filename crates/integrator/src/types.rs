//! Deterministic match inputs and enhanced outputs.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use model::MlPrediction;

/// Outcome of a match decision, deterministic or enhanced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MatchOutcome {
    NoMatch,
    PotentialMatch,
    DefiniteMatch,
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MatchOutcome::NoMatch => "no-match",
            MatchOutcome::PotentialMatch => "potential-match",
            MatchOutcome::DefiniteMatch => "definite-match",
        };
        f.write_str(label)
    }
}

/// Per-field contribution inside a deterministic score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldScore {
    pub field: String,
    pub score: f64,
    pub max_score: f64,
}

/// Score block carried by a deterministic match result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchScore {
    pub total_score: f64,
    pub max_possible_score: f64,
    /// `total_score / max_possible_score`, in `[0, 1]`.
    pub normalized_score: f64,
    #[serde(default)]
    pub field_scores: Vec<FieldScore>,
}

/// A match result produced by the upstream deterministic/probabilistic
/// engine. Consumed, never produced, by this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeterministicMatch {
    pub outcome: MatchOutcome,
    pub candidate_record: JsonValue,
    pub score: MatchScore,
    pub explanation: String,
}

/// A deterministic match result enriched (or deliberately left untouched)
/// by an ML prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnhancedMatch {
    pub outcome: MatchOutcome,
    pub candidate_record: JsonValue,
    pub score: MatchScore,
    pub explanation: String,
    /// Whether the ML prediction affected the score and outcome.
    pub ml_used: bool,
    /// The prediction, when one was computed. In fallback mode it is also
    /// attached for reference on definite matches it did not affect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_prediction: Option<MlPrediction>,
    /// Message describing why ML was skipped after a timeout or error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_error: Option<String>,
    /// Score points contributed by the ML probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_score_contribution: Option<f64>,
    /// Score points contributed by the prior deterministic score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilistic_score_contribution: Option<f64>,
    /// Wall-clock prediction time, when individually attributable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_time_ms: Option<u64>,
}

impl EnhancedMatch {
    /// A result that passes the prior through unmodified.
    pub(crate) fn passthrough(prior: &DeterministicMatch) -> Self {
        Self {
            outcome: prior.outcome,
            candidate_record: prior.candidate_record.clone(),
            score: prior.score.clone(),
            explanation: prior.explanation.clone(),
            ml_used: false,
            ml_prediction: None,
            ml_error: None,
            ml_score_contribution: None,
            probabilistic_score_contribution: None,
            ml_time_ms: None,
        }
    }
}

/// Aggregate statistics for one batch enhancement call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchStats {
    /// Number of candidates processed.
    pub total: usize,
    /// Candidates whose score was actually affected by ML.
    pub ml_used: usize,
    /// Total wall-clock time spent in prediction calls.
    pub ml_time_ms: u64,
}

/// Batch results plus aggregate statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchEnhanceOutcome {
    pub results: Vec<EnhancedMatch>,
    pub stats: BatchStats,
}

/// Decision returned by the pure-ML matching path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MlMatchDecision {
    pub outcome: MatchOutcome,
    pub probability: f64,
    pub confidence: f64,
    pub explanation: String,
}
