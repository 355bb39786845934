// Metrics hooks for the `matcher` crate.
//
// Callers install a global `MatchMetrics` implementation via [`set_match_metrics`];
// every `MatchingAlgorithm::match_targets` call then reports its latency and
// outcome. No metrics backend is assumed.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use distance::DistanceMetric;
use once_cell::sync::OnceCell;

/// Metrics observer for matching runs.
pub trait MatchMetrics: Send + Sync {
    /// Record the outcome of one run.
    ///
    /// `metric` is the configured distance metric, `latency` the wall-clock
    /// duration of the run, `target_count` the number of targets passed in
    /// and `success` whether matches were returned.
    fn record_match(
        &self,
        metric: &DistanceMetric,
        latency: Duration,
        target_count: usize,
        success: bool,
    );
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
