//! Routing metrics for observability
//!
//! Counts where entries went, so degraded operation is visible without
//! parsing the fallback output.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing routing decisions
///
/// # Example
///
/// ```
/// use rust_fallback_logger::RoutingMetrics;
///
/// let metrics = RoutingMetrics::new();
/// metrics.record_remote();
/// metrics.record_fallback();
///
/// assert_eq!(metrics.total_dispatched(), 2);
/// assert_eq!(metrics.fallback_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct RoutingMetrics {
    /// Entries handed to the remote client
    remote_submitted: AtomicU64,

    /// Entries written to the fallback sink
    fallback_written: AtomicU64,

    /// Fallback writes that returned an error
    fallback_failures: AtomicU64,

    /// Entries rerouted to the fallback sink because the context was done
    /// while a remote client was live
    cancelled_reroutes: AtomicU64,
}

impl RoutingMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            remote_submitted: AtomicU64::new(0),
            fallback_written: AtomicU64::new(0),
            fallback_failures: AtomicU64::new(0),
            cancelled_reroutes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn remote_submitted(&self) -> u64 {
        self.remote_submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn fallback_written(&self) -> u64 {
        self.fallback_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn fallback_failures(&self) -> u64 {
        self.fallback_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cancelled_reroutes(&self) -> u64 {
        self.cancelled_reroutes.load(Ordering::Relaxed)
    }

    /// Entries dispatched to either sink
    #[inline]
    pub fn total_dispatched(&self) -> u64 {
        self.remote_submitted() + self.fallback_written()
    }

    #[inline]
    pub fn record_remote(&self) {
        self.remote_submitted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_fallback(&self) {
        self.fallback_written.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_fallback_failure(&self) -> u64 {
        self.fallback_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_cancelled_reroute(&self) {
        self.cancelled_reroutes.fetch_add(1, Ordering::Relaxed);
    }

    /// Percentage of dispatched entries that went to the fallback sink
    pub fn fallback_rate(&self) -> f64 {
        let total = self.total_dispatched();
        if total == 0 {
            return 0.0;
        }
        (self.fallback_written() as f64 / total as f64) * 100.0
    }
}

impl Default for RoutingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = RoutingMetrics::new();
        assert_eq!(metrics.total_dispatched(), 0);
        assert_eq!(metrics.fallback_rate(), 0.0);
    }

    #[test]
    fn test_fallback_rate() {
        let metrics = RoutingMetrics::new();
        for _ in 0..75 {
            metrics.record_remote();
        }
        for _ in 0..25 {
            metrics.record_fallback();
        }

        let rate = metrics.fallback_rate();
        assert!((24.9..=25.1).contains(&rate), "Fallback rate was {}", rate);
    }

    #[test]
    fn test_failure_counter_returns_previous() {
        let metrics = RoutingMetrics::new();
        assert_eq!(metrics.record_fallback_failure(), 0);
        assert_eq!(metrics.record_fallback_failure(), 1);
        assert_eq!(metrics.fallback_failures(), 2);
    }
}
