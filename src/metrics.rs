//! Prometheus metrics for the fan-out engine.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    /// Fan-out operations processed, labeled by kind.
    pub static ref OPERATIONS_PROCESSED: IntCounterVec = IntCounterVec::new(
        Opts::new("maskrelay_operations_processed_total", "Fan-out operations processed"),
        &["kind"],
    )
    .unwrap();

    /// Per-recipient deliveries attempted, labeled by kind.
    pub static ref DELIVERIES_REQUESTED: IntCounterVec = IntCounterVec::new(
        Opts::new("maskrelay_deliveries_requested_total", "Per-recipient deliveries attempted"),
        &["kind"],
    )
    .unwrap();

    /// Per-recipient delivery failures, labeled by kind.
    pub static ref DELIVERIES_FAILED: IntCounterVec = IntCounterVec::new(
        Opts::new("maskrelay_deliveries_failed_total", "Per-recipient delivery failures"),
        &["kind"],
    )
    .unwrap();

    /// Groups with a currently running worker.
    pub static ref ACTIVE_GROUPS: IntGauge = IntGauge::new(
        "maskrelay_active_groups",
        "Groups with a running worker task",
    )
    .unwrap();

    /// Live mask assignments across all groups.
    pub static ref MASK_POOL_OCCUPANCY: IntGauge = IntGauge::new(
        "maskrelay_mask_pool_occupancy",
        "Currently live mask assignments across all groups",
    )
    .unwrap();

    /// Times a mask allocation failed due to universe exhaustion.
    pub static ref MASK_EXHAUSTION_TOTAL: IntCounter = IntCounter::new(
        "maskrelay_mask_exhaustion_total",
        "Mask allocation attempts that failed with MaskNotAvailable",
    )
    .unwrap();
}

/// Register all collectors. Must be called once at startup.
pub fn init() {
    REGISTRY.register(Box::new(OPERATIONS_PROCESSED.clone())).unwrap();
    REGISTRY.register(Box::new(DELIVERIES_REQUESTED.clone())).unwrap();
    REGISTRY.register(Box::new(DELIVERIES_FAILED.clone())).unwrap();
    REGISTRY.register(Box::new(ACTIVE_GROUPS.clone())).unwrap();
    REGISTRY.register(Box::new(MASK_POOL_OCCUPANCY.clone())).unwrap();
    REGISTRY.register(Box::new(MASK_EXHAUSTION_TOTAL.clone())).unwrap();
}

/// Record one completed operation's per-recipient counters.
pub fn record_operation(kind: &str, requests: u64, errors: u64) {
    OPERATIONS_PROCESSED.with_label_values(&[kind]).inc();
    DELIVERIES_REQUESTED.with_label_values(&[kind]).inc_by(requests);
    DELIVERIES_FAILED.with_label_values(&[kind]).inc_by(errors);
}

pub fn record_mask_exhaustion() {
    MASK_EXHAUSTION_TOTAL.inc();
}

/// Gather all metrics in Prometheus text exposition format.
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
