// Metrics hooks for the integrator crate.
//
// Callers install a global `IntegrationMetrics` implementation via
// [`set_integration_metrics`], then `ScoreIntegrator` reports per-call
// latency and whether ML was applied. This keeps instrumentation decoupled
// from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::config::IntegrationMode;

/// Metrics observer for score-integration operations.
pub trait IntegrationMetrics: Send + Sync {
    /// Record one enhancement.
    ///
    /// `mode` is the configured [`IntegrationMode`], `latency` the
    /// wall-clock duration of the whole call, and `ml_used` whether the ML
    /// prediction affected the final score.
    fn record_enhance(&self, mode: &IntegrationMode, latency: Duration, ml_used: bool);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn IntegrationMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn IntegrationMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn IntegrationMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global integration metrics recorder.
///
/// Typically called once during service startup so every `ScoreIntegrator`
/// instance shares the same metrics backend.
pub fn set_integration_metrics(recorder: Option<Arc<dyn IntegrationMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
