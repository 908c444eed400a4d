//! Metrics collection for batch monitoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lumenbatch_common::BatchResult;

/// Coordinator metrics.
pub struct BatchMetrics {
    /// Batches run to completion.
    pub batches_total: AtomicU64,
    /// Batches aborted before producing a result.
    pub batches_failed: AtomicU64,
    /// Batches that hit the global deadline with payments still pending.
    pub batches_with_pending: AtomicU64,
    /// Payments processed across all batches.
    pub payments_total: AtomicU64,
    /// Payments that ended COMPLETED.
    pub payments_success: AtomicU64,
    /// Payments left PENDING at batch return.
    pub payments_pending: AtomicU64,
    /// Payments that ended ERROR.
    pub payments_error: AtomicU64,
}

impl BatchMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            batches_total: AtomicU64::new(0),
            batches_failed: AtomicU64::new(0),
            batches_with_pending: AtomicU64::new(0),
            payments_total: AtomicU64::new(0),
            payments_success: AtomicU64::new(0),
            payments_pending: AtomicU64::new(0),
            payments_error: AtomicU64::new(0),
        }
    }

    /// Record a completed batch from its result.
    pub fn record_batch(&self, res: &BatchResult) {
        self.batches_total.fetch_add(1, Ordering::Relaxed);
        if res.count_pending > 0 {
            self.batches_with_pending.fetch_add(1, Ordering::Relaxed);
        }
        self.payments_total
            .fetch_add(res.payments.len() as u64, Ordering::Relaxed);
        self.payments_success
            .fetch_add(res.count_success as u64, Ordering::Relaxed);
        self.payments_pending
            .fetch_add(res.count_pending as u64, Ordering::Relaxed);
        self.payments_error
            .fetch_add(res.count_error as u64, Ordering::Relaxed);
    }

    /// Record a batch that aborted before producing a result.
    pub fn record_fatal(&self) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_total: self.batches_total.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            batches_with_pending: self.batches_with_pending.load(Ordering::Relaxed),
            payments_total: self.payments_total.load(Ordering::Relaxed),
            payments_success: self.payments_success.load(Ordering::Relaxed),
            payments_pending: self.payments_pending.load(Ordering::Relaxed),
            payments_error: self.payments_error.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP lumenbatch_batches_total Total batches run to completion
# TYPE lumenbatch_batches_total counter
lumenbatch_batches_total {}

# HELP lumenbatch_batches_failed Batches aborted before producing a result
# TYPE lumenbatch_batches_failed counter
lumenbatch_batches_failed {}

# HELP lumenbatch_batches_with_pending Batches that returned with pending payments
# TYPE lumenbatch_batches_with_pending counter
lumenbatch_batches_with_pending {}

# HELP lumenbatch_payments_total Payments processed
# TYPE lumenbatch_payments_total counter
lumenbatch_payments_total {}

# HELP lumenbatch_payments_success Payments completed
# TYPE lumenbatch_payments_success counter
lumenbatch_payments_success {}

# HELP lumenbatch_payments_pending Payments left pending
# TYPE lumenbatch_payments_pending counter
lumenbatch_payments_pending {}

# HELP lumenbatch_payments_error Payments failed
# TYPE lumenbatch_payments_error counter
lumenbatch_payments_error {}
"#,
            snapshot.batches_total,
            snapshot.batches_failed,
            snapshot.batches_with_pending,
            snapshot.payments_total,
            snapshot.payments_success,
            snapshot.payments_pending,
            snapshot.payments_error,
        )
    }
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub batches_total: u64,
    pub batches_failed: u64,
    pub batches_with_pending: u64,
    pub payments_total: u64,
    pub payments_success: u64,
    pub payments_pending: u64,
    pub payments_error: u64,
}

/// Shared metrics instance.
pub type SharedMetrics = Arc<BatchMetrics>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_batch() {
        let metrics = BatchMetrics::new();

        let res = BatchResult {
            count_success: 2,
            count_pending: 1,
            count_error: 1,
            ..Default::default()
        };

        metrics.record_batch(&res);
        metrics.record_fatal();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.batches_total, 1);
        assert_eq!(snapshot.batches_failed, 1);
        assert_eq!(snapshot.batches_with_pending, 1);
        assert_eq!(snapshot.payments_success, 2);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = BatchMetrics::new();
        let res = BatchResult {
            count_success: 1,
            ..Default::default()
        };
        metrics.record_batch(&res);

        let output = metrics.to_prometheus();
        assert!(output.contains("lumenbatch_batches_total 1"));
        assert!(output.contains("lumenbatch_payments_success 1"));
    }
}
