//! Pure scoring math shared by the classifier and the training loop.

use features::MatchLabel;

use crate::config::ClassifierConfig;

/// Logits are clamped into this symmetric range before the sigmoid so that
/// extreme weight/feature products stay finite.
pub const LOGIT_CLAMP: f64 = 500.0;

/// Standard logistic function.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// `sigmoid(clamp(weights . features + bias))`.
///
/// Caller guarantees `weights.len() == features.len()`.
pub fn probability(weights: &[f64], bias: f64, features: &[f64]) -> f64 {
    debug_assert_eq!(weights.len(), features.len());
    let logit: f64 = weights
        .iter()
        .zip(features)
        .map(|(w, x)| w * x)
        .sum::<f64>()
        + bias;
    sigmoid(logit.clamp(-LOGIT_CLAMP, LOGIT_CLAMP))
}

/// Two-threshold classification of a probability.
pub fn classify(probability: f64, config: &ClassifierConfig) -> MatchLabel {
    if probability >= config.match_threshold {
        MatchLabel::Match
    } else if probability <= config.non_match_threshold {
        MatchLabel::NonMatch
    } else {
        MatchLabel::Uncertain
    }
}

/// Linear distance-to-threshold confidence.
///
/// For a match, 1.0 at probability 1.0 and 0.0 at the match threshold; for a
/// non-match, 1.0 at probability 0.0 and 0.0 at the non-match threshold; for
/// uncertain, distance from the threshold midpoint toward either threshold
/// (0.0 at the midpoint, 1.0 at a threshold). Degenerate threshold positions
/// (a threshold sitting at its own extreme) yield full confidence.
pub fn confidence(probability: f64, label: MatchLabel, config: &ClassifierConfig) -> f64 {
    let value = match label {
        MatchLabel::Match => {
            let span = 1.0 - config.match_threshold;
            if span > 0.0 {
                (probability - config.match_threshold) / span
            } else {
                1.0
            }
        }
        MatchLabel::NonMatch => {
            let span = config.non_match_threshold;
            if span > 0.0 {
                (span - probability) / span
            } else {
                1.0
            }
        }
        MatchLabel::Uncertain => {
            let midpoint = (config.match_threshold + config.non_match_threshold) / 2.0;
            let half_span = (config.match_threshold - config.non_match_threshold) / 2.0;
            if half_span > 0.0 {
                (probability - midpoint).abs() / half_span
            } else {
                1.0
            }
        }
    };
    value.clamp(0.0, 1.0)
}
