use thiserror::Error;

/// Errors surfaced by the feature extraction layer.
///
/// Configuration problems are reported at [`FeatureExtractor`] construction,
/// before any extraction runs; only non-finite feature values can surface at
/// extraction time.
///
/// [`FeatureExtractor`]: crate::FeatureExtractor
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeatureError {
    /// The extraction configuration is inconsistent (empty field list, field
    /// without a name, field without extractors, nonpositive weight).
    #[error("invalid feature config: {0}")]
    InvalidConfig(String),
    /// A field references a custom extractor that was never registered.
    #[error("unregistered custom extractor: {0}")]
    UnknownCustomExtractor(String),
    /// An extractor produced a NaN or infinite value for the named feature.
    #[error("feature '{name}' produced a non-finite value: {value}")]
    NonFiniteFeature { name: String, value: f64 },
}
