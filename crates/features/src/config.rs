use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Identifier for a similarity extractor applied to one field.
///
/// Most kinds delegate to the external comparator collaborator; `numeric_diff`
/// and `date_diff` are computed by the extractor itself, and `custom` calls a
/// function registered at construction time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Exact string equality (1.0 or 0.0).
    Exact,
    /// Normalized Levenshtein edit-distance similarity.
    Levenshtein,
    /// Jaro-Winkler similarity.
    JaroWinkler,
    /// Soundex phonetic-code equality.
    Soundex,
    /// Metaphone phonetic-code equality.
    Metaphone,
    /// Relative numeric closeness: `max(0, 1 - |a-b| / max(|a|,|b|))`.
    NumericDiff,
    /// Date closeness: `exp(-days_apart / 365)`.
    DateDiff,
    /// Explicit missing-value indicator (1.0 when either side is absent).
    Missing,
    /// A named function registered on the extractor.
    Custom { name: String },
}

impl ExtractorKind {
    /// Stable suffix used when generating feature names.
    pub fn label(&self) -> &str {
        match self {
            ExtractorKind::Exact => "exact",
            ExtractorKind::Levenshtein => "levenshtein",
            ExtractorKind::JaroWinkler => "jaro_winkler",
            ExtractorKind::Soundex => "soundex",
            ExtractorKind::Metaphone => "metaphone",
            ExtractorKind::NumericDiff => "numeric_diff",
            ExtractorKind::DateDiff => "date_diff",
            ExtractorKind::Missing => "missing",
            ExtractorKind::Custom { name } => name.as_str(),
        }
    }
}

/// Extraction plan for a single record field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldFeatureConfig {
    /// Dotted path into the record, e.g. `"address.city"`.
    pub field: String,
    /// Extractors applied to this field, in output order.
    pub extractors: Vec<ExtractorKind>,
    /// Multiplier applied to every comparator output for this field.
    #[serde(default = "FieldFeatureConfig::default_weight")]
    pub weight: f64,
    /// Whether to append an automatic missing-value indicator after the
    /// configured extractors. Ignored when the field already lists
    /// [`ExtractorKind::Missing`] explicitly.
    #[serde(default = "FieldFeatureConfig::default_missing_indicator")]
    pub include_missing_indicator: bool,
}

impl FieldFeatureConfig {
    pub(crate) fn default_weight() -> f64 {
        1.0
    }

    pub(crate) fn default_missing_indicator() -> bool {
        true
    }

    /// Convenience constructor with default weight and indicator settings.
    pub fn new(field: &str, extractors: Vec<ExtractorKind>) -> Self {
        Self {
            field: field.to_string(),
            extractors,
            weight: Self::default_weight(),
            include_missing_indicator: Self::default_missing_indicator(),
        }
    }

    /// Whether the automatic indicator slot exists for this field.
    pub(crate) fn wants_auto_indicator(&self) -> bool {
        self.include_missing_indicator
            && !self
                .extractors
                .iter()
                .any(|kind| matches!(kind, ExtractorKind::Missing))
    }
}

/// Full extraction configuration: an ordered list of per-field plans plus
/// output normalization.
///
/// `FeatureConfig` is cheap to clone and serde-friendly so it can be embedded
/// in higher-level pipeline configs. It is immutable once handed to a
/// [`FeatureExtractor`]; validation happens at extractor construction.
///
/// [`FeatureExtractor`]: crate::FeatureExtractor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureConfig {
    /// Configuration schema version.
    #[serde(default = "FeatureConfig::default_version")]
    pub version: u32,
    /// Per-field extraction plans, in output order.
    pub fields: Vec<FieldFeatureConfig>,
    /// Clamp every output value into `[0.0, 1.0]`. Extractors are expected to
    /// emit normalized similarities already; clamping only guards weighted
    /// outliers.
    #[serde(default = "FeatureConfig::default_normalize")]
    pub normalize: bool,
}

impl FeatureConfig {
    pub(crate) fn default_version() -> u32 {
        1
    }

    pub(crate) fn default_normalize() -> bool {
        true
    }

    /// Plan over the given fields with default normalization.
    pub fn with_fields(fields: Vec<FieldFeatureConfig>) -> Self {
        Self {
            version: Self::default_version(),
            fields,
            normalize: Self::default_normalize(),
        }
    }

    /// Validate structural invariants that do not depend on the custom
    /// extractor registry. Registry checks happen at extractor construction.
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.version == 0 {
            return Err(FeatureError::InvalidConfig(
                "config.version must not be zero".into(),
            ));
        }
        if self.fields.is_empty() {
            return Err(FeatureError::InvalidConfig(
                "at least one field must be configured".into(),
            ));
        }
        for field in &self.fields {
            if field.field.trim().is_empty() {
                return Err(FeatureError::InvalidConfig(
                    "field name must not be empty".into(),
                ));
            }
            if field.extractors.is_empty() {
                return Err(FeatureError::InvalidConfig(format!(
                    "field '{}' has no extractors",
                    field.field
                )));
            }
            if !(field.weight > 0.0) {
                return Err(FeatureError::InvalidConfig(format!(
                    "field '{}' has nonpositive weight {}",
                    field.field, field.weight
                )));
            }
        }
        Ok(())
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            fields: Vec::new(),
            normalize: Self::default_normalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_field() -> FieldFeatureConfig {
        FieldFeatureConfig::new(
            "name",
            vec![ExtractorKind::Exact, ExtractorKind::JaroWinkler],
        )
    }

    #[test]
    fn valid_config_passes() {
        let cfg = FeatureConfig::with_fields(vec![name_field()]);
        assert!(cfg.validate().is_ok());
        assert!(cfg.normalize);
        assert_eq!(cfg.version, 1);
    }

    #[test]
    fn empty_fields_rejected() {
        let cfg = FeatureConfig::with_fields(vec![]);
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(err.to_string().contains("at least one field"));
    }

    #[test]
    fn field_without_extractors_rejected() {
        let cfg = FeatureConfig::with_fields(vec![FieldFeatureConfig::new("email", vec![])]);
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(err.to_string().contains("email"));
        assert!(err.to_string().contains("no extractors"));
    }

    #[test]
    fn blank_field_name_rejected() {
        let cfg = FeatureConfig::with_fields(vec![FieldFeatureConfig::new(
            "  ",
            vec![ExtractorKind::Exact],
        )]);
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn nonpositive_weight_rejected() {
        let mut field = name_field();
        field.weight = 0.0;
        let cfg = FeatureConfig::with_fields(vec![field]);
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(err.to_string().contains("nonpositive weight"));
    }

    #[test]
    fn extractor_kind_serializes_with_type_tag() {
        let kind = ExtractorKind::Custom {
            name: "initials".into(),
        };
        let text = serde_json::to_string(&kind).unwrap();
        assert_eq!(text, r#"{"type":"custom","name":"initials"}"#);

        let back: ExtractorKind = serde_json::from_str(r#"{"type":"jaro_winkler"}"#).unwrap();
        assert_eq!(back, ExtractorKind::JaroWinkler);
    }

    #[test]
    fn explicit_missing_suppresses_auto_indicator() {
        let field = FieldFeatureConfig::new("phone", vec![ExtractorKind::Missing]);
        assert!(!field.wants_auto_indicator());

        let field = FieldFeatureConfig::new("phone", vec![ExtractorKind::Exact]);
        assert!(field.wants_auto_indicator());
    }
}
