//! # Identity-Resolution Score Integration (`integrator`)
//!
//! ## Purpose
//!
//! `integrator` sits on top of the model layer (`model`) and combines ML
//! match probabilities with the match results an upstream deterministic/
//! probabilistic engine already produced. It selects between three
//! strategies (ML-only, weighted hybrid, fallback-on-uncertainty), enforces
//! a prediction timeout with a fallback-or-propagate policy, and re-ranks
//! candidate lists by the blended score.
//!
//! ## Strategies
//!
//! - [`IntegrationMode::MlOnly`]: `total = probability * max_possible`;
//!   the outcome is reclassified purely from the probability.
//! - [`IntegrationMode::Hybrid`]: a weighted blend of probability and the
//!   prior normalized score, with both contributions reported separately.
//! - [`IntegrationMode::Fallback`]: ML applies only when the prior outcome
//!   is not already a definite match; for definite matches the prediction
//!   is attached for reference without affecting the score.
//!
//! `apply_to: uncertain_only` further restricts application to priors below
//! definite-match, regardless of mode. Both gates key on the *prior
//! deterministic outcome*, not the ML classification.
//!
//! ## Concurrency
//!
//! Predictions race a `tokio` timer; the losing prediction future is
//! dropped, so an in-process prediction cannot outlive the call. Within a
//! batch, output order matches input order until the single explicit
//! re-sort by final `total_score`.
//!
//! ## Observability
//!
//! Install an [`IntegrationMetrics`] implementation via
//! [`set_integration_metrics`] to record per-call latency and ML usage.
//! This is typically done once during service startup so all
//! [`ScoreIntegrator`] instances share the same metrics backend.

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod types;

pub use crate::config::{ApplyTo, IntegrationConfig, IntegrationMode, OutcomeThresholds};
pub use crate::engine::ScoreIntegrator;
pub use crate::error::IntegrateError;
pub use crate::metrics::{set_integration_metrics, IntegrationMetrics};
pub use crate::types::{
    BatchEnhanceOutcome, BatchStats, DeterministicMatch, EnhancedMatch, FieldScore, MatchOutcome,
    MatchScore, MlMatchDecision,
};
