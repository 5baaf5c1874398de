//! YAML configuration file support for the identity-resolution pipeline.
//!
//! This module lets deployments define all stage configurations (features,
//! classifier, training, integration) in a single YAML file and load them at
//! runtime. Every section is optional and falls back to the stage defaults;
//! a loaded config is validated section by section before use.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # Identity-resolution pipeline configuration
//! version: "1.0"
//!
//! features:
//!   version: 1
//!   normalize: true
//!   fields:
//!     - field: "name"
//!       extractors:
//!         - type: jaro_winkler
//!         - type: soundex
//!       weight: 2.0
//!     - field: "birth_date"
//!       extractors:
//!         - type: date_diff
//!
//! classifier:
//!   match_threshold: 0.8
//!   non_match_threshold: 0.4
//!   include_feature_importance: false
//!   batch_size: 32
//!
//! training:
//!   learning_rate: 0.1
//!   max_iterations: 100
//!   regularization: 0.01
//!   validation_split: 0.2
//!   early_stopping_patience: 10
//!   seed: 42
//!
//! integration:
//!   mode: hybrid
//!   ml_weight: 0.7
//!   apply_to: all
//!   timeout_ms: 5000
//!   fallback_on_error: true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use features::FeatureConfig;
use integrator::IntegrationConfig;
use model::ClassifierConfig;
use trainer::TrainingConfig;

/// Errors that can occur when loading a pipeline configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration covering every pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Config file schema version; the `1.x` line is supported.
    #[serde(default = "PipelineConfig::default_version")]
    pub version: String,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub integration: IntegrationConfig,
}

impl PipelineConfig {
    pub(crate) fn default_version() -> String {
        "1.0".to_string()
    }

    /// Validate every section against its stage invariants.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if !self.version.starts_with('1') {
            return Err(ConfigLoadError::UnsupportedVersion(self.version.clone()));
        }
        self.features
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("features: {e}")))?;
        self.classifier
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("classifier: {e}")))?;
        self.training
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("training: {e}")))?;
        self.integration
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("integration: {e}")))?;
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            features: FeatureConfig::default(),
            classifier: ClassifierConfig::default(),
            training: TrainingConfig::default(),
            integration: IntegrationConfig::default(),
        }
    }
}

/// Parse a pipeline configuration from YAML text and validate it.
pub fn parse_pipeline_config(text: &str) -> Result<PipelineConfig, ConfigLoadError> {
    let config: PipelineConfig = serde_yaml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a pipeline configuration from a YAML file.
pub fn load_pipeline_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigLoadError> {
    let text = fs::read_to_string(path)?;
    parse_pipeline_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use features::ExtractorKind;
    use integrator::IntegrationMode;

    const SAMPLE: &str = r#"
version: "1.0"
features:
  fields:
    - field: "name"
      extractors:
        - type: jaro_winkler
        - type: soundex
      weight: 2.0
    - field: "birth_date"
      extractors:
        - type: date_diff
classifier:
  match_threshold: 0.85
  non_match_threshold: 0.35
training:
  learning_rate: 0.2
  seed: 42
integration:
  mode: ml_only
  timeout_ms: 250
"#;

    #[test]
    fn parses_a_full_config() {
        let config = parse_pipeline_config(SAMPLE).unwrap();
        assert_eq!(config.features.fields.len(), 2);
        assert_eq!(config.features.fields[0].weight, 2.0);
        assert_eq!(
            config.features.fields[0].extractors,
            vec![ExtractorKind::JaroWinkler, ExtractorKind::Soundex]
        );
        assert_eq!(config.classifier.match_threshold, 0.85);
        assert_eq!(config.training.seed, Some(42));
        // Unspecified fields fall back to stage defaults.
        assert_eq!(
            config.training.max_iterations,
            TrainingConfig::default().max_iterations
        );
        assert_eq!(config.integration.mode, IntegrationMode::MlOnly);
        assert_eq!(config.integration.timeout_ms, 250);
    }

    #[test]
    fn rejects_unsupported_versions() {
        let text = SAMPLE.replace("version: \"1.0\"", "version: \"2.0\"");
        let err = parse_pipeline_config(&text).expect_err("version 2 unsupported");
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(_)));
    }

    #[test]
    fn rejects_invalid_sections_with_context() {
        let text = SAMPLE.replace("learning_rate: 0.2", "learning_rate: -0.2");
        let err = parse_pipeline_config(&text).expect_err("invalid learning rate");
        match err {
            ConfigLoadError::Validation(message) => {
                assert!(message.contains("training"));
                assert!(message.contains("learning_rate"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_feature_sections() {
        let err = parse_pipeline_config("version: \"1.0\"\n").expect_err("no fields");
        match err {
            ConfigLoadError::Validation(message) => assert!(message.contains("features")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = parse_pipeline_config("version: [unclosed").expect_err("bad yaml");
        assert!(matches!(err, ConfigLoadError::YamlParse(_)));
    }
}
