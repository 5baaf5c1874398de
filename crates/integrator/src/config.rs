use serde::{Deserialize, Serialize};

use crate::error::IntegrateError;
use crate::types::MatchOutcome;

/// Strategy for combining the ML probability with the prior deterministic
/// score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMode {
    /// The ML probability alone determines the final score and outcome.
    MlOnly,
    /// Weighted blend of the ML probability and the prior normalized score.
    #[default]
    Hybrid,
    /// The ML score replaces the prior only when the prior outcome is not
    /// already a definite match; for definite matches the prediction is
    /// attached for reference without affecting the score.
    Fallback,
}

impl std::fmt::Display for IntegrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            IntegrationMode::MlOnly => "ml_only",
            IntegrationMode::Hybrid => "hybrid",
            IntegrationMode::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

/// Which prior outcomes ML enhancement applies to.
///
/// Both this gate and [`IntegrationMode::Fallback`] key on the *prior
/// deterministic outcome*, not on the ML classification — two different
/// match-quality signals. Preserved as-is pending product review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplyTo {
    /// Enhance every candidate.
    #[default]
    All,
    /// Skip candidates the deterministic pass already marked as definite
    /// matches.
    UncertainOnly,
}

/// Probability/normalized-score cut points for reclassifying outcomes.
///
/// Invariant: `0.0 <= potential_match < definite_match <= 1.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutcomeThresholds {
    #[serde(default = "OutcomeThresholds::default_definite_match")]
    pub definite_match: f64,
    #[serde(default = "OutcomeThresholds::default_potential_match")]
    pub potential_match: f64,
}

impl OutcomeThresholds {
    pub(crate) fn default_definite_match() -> f64 {
        0.85
    }

    pub(crate) fn default_potential_match() -> f64 {
        0.5
    }

    /// Map a normalized score or probability to an outcome.
    pub fn classify(&self, value: f64) -> MatchOutcome {
        if value >= self.definite_match {
            MatchOutcome::DefiniteMatch
        } else if value >= self.potential_match {
            MatchOutcome::PotentialMatch
        } else {
            MatchOutcome::NoMatch
        }
    }

    pub fn validate(&self) -> Result<(), IntegrateError> {
        if !(0.0..=1.0).contains(&self.definite_match)
            || !(0.0..=1.0).contains(&self.potential_match)
        {
            return Err(IntegrateError::InvalidConfig(format!(
                "thresholds must lie in [0, 1]: definite={}, potential={}",
                self.definite_match, self.potential_match
            )));
        }
        if self.potential_match >= self.definite_match {
            return Err(IntegrateError::InvalidConfig(format!(
                "potential_match {} must be below definite_match {}",
                self.potential_match, self.definite_match
            )));
        }
        Ok(())
    }
}

impl Default for OutcomeThresholds {
    fn default() -> Self {
        Self {
            definite_match: Self::default_definite_match(),
            potential_match: Self::default_potential_match(),
        }
    }
}

/// Configuration for the score integrator.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// pipeline configs; validated once at [`ScoreIntegrator`] construction.
///
/// [`ScoreIntegrator`]: crate::ScoreIntegrator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegrationConfig {
    #[serde(default)]
    pub mode: IntegrationMode,
    /// Weight given to the ML probability in [`IntegrationMode::Hybrid`],
    /// in `[0, 1]`; the prior score receives the complement.
    #[serde(default = "IntegrationConfig::default_ml_weight")]
    pub ml_weight: f64,
    #[serde(default)]
    pub apply_to: ApplyTo,
    /// Window the prediction must resolve within.
    #[serde(default = "IntegrationConfig::default_timeout_ms")]
    pub timeout_ms: u64,
    /// On a prediction timeout or error: `true` preserves the unmodified
    /// prior score and records the error on the result; `false` propagates
    /// the error to the caller.
    #[serde(default = "IntegrationConfig::default_fallback_on_error")]
    pub fallback_on_error: bool,
    #[serde(default)]
    pub thresholds: OutcomeThresholds,
}

impl IntegrationConfig {
    pub(crate) fn default_ml_weight() -> f64 {
        0.7
    }

    pub(crate) fn default_timeout_ms() -> u64 {
        5_000
    }

    pub(crate) fn default_fallback_on_error() -> bool {
        true
    }

    pub fn validate(&self) -> Result<(), IntegrateError> {
        if !(0.0..=1.0).contains(&self.ml_weight) {
            return Err(IntegrateError::InvalidConfig(format!(
                "ml_weight must lie in [0, 1], got {}",
                self.ml_weight
            )));
        }
        if self.timeout_ms == 0 {
            return Err(IntegrateError::InvalidConfig(
                "timeout_ms must be greater than zero".into(),
            ));
        }
        self.thresholds.validate()
    }
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            mode: IntegrationMode::default(),
            ml_weight: Self::default_ml_weight(),
            apply_to: ApplyTo::default(),
            timeout_ms: Self::default_timeout_ms(),
            fallback_on_error: Self::default_fallback_on_error(),
            thresholds: OutcomeThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = IntegrationConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.mode, IntegrationMode::Hybrid);
        assert_eq!(cfg.apply_to, ApplyTo::All);
        assert!(cfg.fallback_on_error);
    }

    #[test]
    fn ml_weight_out_of_range_rejected() {
        let cfg = IntegrationConfig {
            ml_weight: 1.5,
            ..IntegrationConfig::default()
        };
        let err = cfg.validate().expect_err("invalid");
        assert!(err.to_string().contains("ml_weight"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let cfg = IntegrationConfig {
            timeout_ms: 0,
            ..IntegrationConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let cfg = IntegrationConfig {
            thresholds: OutcomeThresholds {
                definite_match: 0.4,
                potential_match: 0.6,
            },
            ..IntegrationConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn thresholds_classify_outcomes() {
        let thresholds = OutcomeThresholds::default();
        assert_eq!(thresholds.classify(0.9), MatchOutcome::DefiniteMatch);
        assert_eq!(thresholds.classify(0.85), MatchOutcome::DefiniteMatch);
        assert_eq!(thresholds.classify(0.6), MatchOutcome::PotentialMatch);
        assert_eq!(thresholds.classify(0.2), MatchOutcome::NoMatch);
    }

    #[test]
    fn modes_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&IntegrationMode::MlOnly).unwrap(),
            "\"ml_only\""
        );
        assert_eq!(
            serde_json::to_string(&ApplyTo::UncertainOnly).unwrap(),
            "\"uncertain_only\""
        );
    }
}
