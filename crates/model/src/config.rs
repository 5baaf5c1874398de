use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Decision thresholds and scoring options for a classifier.
///
/// Invariant: `0.0 <= non_match_threshold < match_threshold <= 1.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    /// Probability at or above which a pair classifies as a match.
    #[serde(default = "ClassifierConfig::default_match_threshold")]
    pub match_threshold: f64,
    /// Probability at or below which a pair classifies as a non-match.
    #[serde(default = "ClassifierConfig::default_non_match_threshold")]
    pub non_match_threshold: f64,
    /// Whether predictions carry per-feature contribution breakdowns.
    #[serde(default)]
    pub include_feature_importance: bool,
    /// Chunk size used by batch prediction.
    #[serde(default = "ClassifierConfig::default_batch_size")]
    pub batch_size: usize,
}

impl ClassifierConfig {
    pub(crate) fn default_match_threshold() -> f64 {
        0.8
    }

    pub(crate) fn default_non_match_threshold() -> f64 {
        0.4
    }

    pub(crate) fn default_batch_size() -> usize {
        32
    }

    /// Validate threshold ordering and batch sizing.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..=1.0).contains(&self.match_threshold)
            || !(0.0..=1.0).contains(&self.non_match_threshold)
        {
            return Err(ModelError::InvalidConfig(format!(
                "thresholds must lie in [0, 1]: match={}, non_match={}",
                self.match_threshold, self.non_match_threshold
            )));
        }
        if self.non_match_threshold >= self.match_threshold {
            return Err(ModelError::InvalidConfig(format!(
                "non_match_threshold {} must be below match_threshold {}",
                self.non_match_threshold, self.match_threshold
            )));
        }
        if self.batch_size == 0 {
            return Err(ModelError::InvalidConfig(
                "batch_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            match_threshold: Self::default_match_threshold(),
            non_match_threshold: Self::default_non_match_threshold(),
            include_feature_importance: false,
            batch_size: Self::default_batch_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = ClassifierConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.non_match_threshold < cfg.match_threshold);
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let cfg = ClassifierConfig {
            match_threshold: 0.3,
            non_match_threshold: 0.7,
            ..ClassifierConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(err.to_string().contains("must be below"));
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let cfg = ClassifierConfig {
            match_threshold: 1.2,
            ..ClassifierConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_batch_size_rejected() {
        let cfg = ClassifierConfig {
            batch_size: 0,
            ..ClassifierConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
