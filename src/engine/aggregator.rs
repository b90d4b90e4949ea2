//! Process-wide and per-group operation status counters.
//!
//! The global counters are a single guarded record, updated once per
//! completed operation by whichever worker finishes it; per-group copies are
//! unguarded because only their own worker ever touches them.

use super::operation::OperationOutcome;
use parking_lot::Mutex;
use std::sync::Arc;

/// A snapshot of accumulated operation counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateStatus {
    pub operations: u64,
    pub requests: u64,
    pub errors: u64,
    pub total_duration_ms: i64,
}

impl AggregateStatus {
    fn record(&mut self, outcome: OperationOutcome) {
        self.operations += 1;
        self.requests += outcome.requests;
        self.errors += outcome.errors;
        self.total_duration_ms += outcome.duration_ms;
    }
}

/// Process-global status aggregator shared across all group workers.
#[derive(Clone)]
pub struct StatusAggregator {
    inner: Arc<Mutex<AggregateStatus>>,
}

impl StatusAggregator {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(AggregateStatus::default())),
        }
    }

    pub fn record(&self, outcome: OperationOutcome) {
        self.inner.lock().record(outcome);
    }

    pub fn snapshot(&self) -> AggregateStatus {
        *self.inner.lock()
    }
}

impl Default for StatusAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_across_records() {
        let agg = StatusAggregator::new();
        agg.record(OperationOutcome { requests: 2, errors: 1, duration_ms: 10 });
        agg.record(OperationOutcome { requests: 3, errors: 0, duration_ms: 5 });
        let snap = agg.snapshot();
        assert_eq!(snap.operations, 2);
        assert_eq!(snap.requests, 5);
        assert_eq!(snap.errors, 1);
        assert_eq!(snap.total_duration_ms, 15);
    }
}
