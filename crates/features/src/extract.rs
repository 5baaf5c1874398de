use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::comparators::Comparators;
use crate::config::{ExtractorKind, FeatureConfig};
use crate::error::FeatureError;
use crate::path::{is_missing, resolve_path, value_to_f64, value_to_string};
use crate::types::{FeatureVector, RecordPair};

/// A caller-registered extractor: a pure function over the two resolved field
/// values, returning a similarity in `[0.0, 1.0]`.
pub type CustomExtractorFn =
    Arc<dyn Fn(Option<&JsonValue>, Option<&JsonValue>) -> f64 + Send + Sync>;

/// Converts record pairs into fixed-length numeric feature vectors.
///
/// Construction validates the configuration (including custom-extractor
/// registration) and precomputes the feature name list; extraction never
/// recomputes names and emits values in field-then-extractor order, each
/// comparator output multiplied by its field weight. An automatic
/// missing-value indicator is appended per field unless disabled or listed
/// explicitly.
pub struct FeatureExtractor {
    config: FeatureConfig,
    comparators: Arc<dyn Comparators>,
    custom: HashMap<String, CustomExtractorFn>,
    names: Vec<String>,
}

impl FeatureExtractor {
    /// Build an extractor with no custom extractors registered.
    ///
    /// Fails fast with a [`FeatureError`] on any configuration problem,
    /// before any extraction can run.
    pub fn new(
        config: FeatureConfig,
        comparators: Arc<dyn Comparators>,
    ) -> Result<Self, FeatureError> {
        Self::with_custom_extractors(config, comparators, HashMap::new())
    }

    /// Build an extractor with a registry of named custom extractors.
    pub fn with_custom_extractors(
        config: FeatureConfig,
        comparators: Arc<dyn Comparators>,
        custom: HashMap<String, CustomExtractorFn>,
    ) -> Result<Self, FeatureError> {
        config.validate()?;
        for field in &config.fields {
            for kind in &field.extractors {
                if let ExtractorKind::Custom { name } = kind {
                    if !custom.contains_key(name) {
                        return Err(FeatureError::UnknownCustomExtractor(name.clone()));
                    }
                }
            }
        }

        let names = Self::build_names(&config);
        debug!(
            fields = config.fields.len(),
            features = names.len(),
            "feature extractor constructed"
        );
        Ok(Self {
            config,
            comparators,
            custom,
            names,
        })
    }

    fn build_names(config: &FeatureConfig) -> Vec<String> {
        let mut names = Vec::new();
        for field in &config.fields {
            for kind in &field.extractors {
                names.push(format!("{}_{}", field.field, kind.label()));
            }
            if field.wants_auto_indicator() {
                names.push(format!("{}_missing", field.field));
            }
        }
        names
    }

    /// Feature names, in the same order as extracted values.
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    /// Length of every vector this extractor produces.
    pub fn feature_count(&self) -> usize {
        self.names.len()
    }

    /// The validated configuration this extractor was built from.
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Extract the feature vector for one record pair.
    pub fn extract(&self, pair: &RecordPair) -> Result<FeatureVector, FeatureError> {
        let mut values = Vec::with_capacity(self.names.len());

        for field in &self.config.fields {
            let v1 = resolve_path(&pair.record1, &field.field);
            let v2 = resolve_path(&pair.record2, &field.field);
            let s1 = value_to_string(v1);
            let s2 = value_to_string(v2);

            for kind in &field.extractors {
                let similarity = match kind {
                    ExtractorKind::Exact => self.comparators.exact(s1.as_deref(), s2.as_deref()),
                    ExtractorKind::Levenshtein => {
                        self.comparators.levenshtein(s1.as_deref(), s2.as_deref())
                    }
                    ExtractorKind::JaroWinkler => {
                        self.comparators.jaro_winkler(s1.as_deref(), s2.as_deref())
                    }
                    ExtractorKind::Soundex => {
                        self.comparators.soundex(s1.as_deref(), s2.as_deref())
                    }
                    ExtractorKind::Metaphone => {
                        self.comparators.metaphone(s1.as_deref(), s2.as_deref())
                    }
                    ExtractorKind::NumericDiff => numeric_diff(v1, v2),
                    ExtractorKind::DateDiff => date_diff(v1, v2),
                    ExtractorKind::Missing => missing_indicator(v1, v2),
                    ExtractorKind::Custom { name } => {
                        // Registration is checked at construction.
                        (self.custom[name])(v1, v2)
                    }
                };
                // The indicator is a raw 0/1 signal; weights apply to
                // similarity outputs only.
                let value = match kind {
                    ExtractorKind::Missing => similarity,
                    _ => similarity * field.weight,
                };
                values.push(value);
            }

            if field.wants_auto_indicator() {
                values.push(missing_indicator(v1, v2));
            }
        }

        if self.config.normalize {
            for value in &mut values {
                *value = value.clamp(0.0, 1.0);
            }
        }
        for (value, name) in values.iter().zip(&self.names) {
            if !value.is_finite() {
                return Err(FeatureError::NonFiniteFeature {
                    name: name.clone(),
                    value: *value,
                });
            }
        }

        Ok(FeatureVector {
            values,
            names: self.names.clone(),
            metadata: None,
        })
    }

    /// Extract vectors for a batch of pairs, preserving input order.
    pub fn extract_batch(&self, pairs: &[RecordPair]) -> Result<Vec<FeatureVector>, FeatureError> {
        pairs.iter().map(|pair| self.extract(pair)).collect()
    }
}

fn missing_indicator(v1: Option<&JsonValue>, v2: Option<&JsonValue>) -> f64 {
    if is_missing(v1) || is_missing(v2) {
        1.0
    } else {
        0.0
    }
}

/// Relative numeric closeness: 1.0 for equal values, otherwise
/// `max(0, 1 - |a-b| / max(|a|,|b|))`; 0.0 for non-numeric or one-sided
/// missing input, 1.0 when both sides are missing.
fn numeric_diff(v1: Option<&JsonValue>, v2: Option<&JsonValue>) -> f64 {
    if is_missing(v1) && is_missing(v2) {
        return 1.0;
    }
    if is_missing(v1) || is_missing(v2) {
        return 0.0;
    }
    match (value_to_f64(v1), value_to_f64(v2)) {
        (Some(a), Some(b)) => {
            if a == b {
                1.0
            } else {
                (1.0 - (a - b).abs() / a.abs().max(b.abs())).max(0.0)
            }
        }
        _ => 0.0,
    }
}

/// Date closeness on a yearly decay curve: `exp(-days_apart / 365)`; 0.0 for
/// unparseable or one-sided missing input, 1.0 when both sides are missing
/// or the dates coincide.
fn date_diff(v1: Option<&JsonValue>, v2: Option<&JsonValue>) -> f64 {
    if is_missing(v1) && is_missing(v2) {
        return 1.0;
    }
    if is_missing(v1) || is_missing(v2) {
        return 0.0;
    }
    match (v1.and_then(parse_date), v2.and_then(parse_date)) {
        (Some(a), Some(b)) => {
            let days_apart = (a - b).num_seconds().abs() as f64 / 86_400.0;
            (-days_apart / 365.0).exp()
        }
        _ => 0.0,
    }
}

fn parse_date(value: &JsonValue) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    if let Ok(stamped) = DateTime::parse_from_rfc3339(text) {
        return Some(stamped.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0)?,
        Utc,
    ))
}
