use crate::category::CategoryKey;
use crate::error::ReputationError;
use crate::record::CategoryUpdate;
use crate::sim::SimId;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, register_int_gauge, IntCounterVec, IntGauge};

/// Trait for reporting reputation changes to a metrics system.
pub trait ReputationMetricsHook: std::fmt::Debug {
    /// A sim received its first record.
    fn sim_registered(&self, sim: SimId);

    /// A category value was written for `sim`.
    fn points_updated(&self, sim: SimId, update: &CategoryUpdate);

    /// Applying an action to `category` failed.
    fn category_failed(&self, sim: SimId, category: &CategoryKey, error: &ReputationError);
}

lazy_static! {
    pub static ref REPUTATION_REGISTERED_SIMS: IntGauge = register_int_gauge!(
        "simrep_registered_sims",
        "Number of sims currently tracked by the reputation registry"
    ).unwrap();

    pub static ref REPUTATION_UPDATES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "simrep_reputation_updates_total",
        "Total number of category point updates applied",
        &["category", "clamped"]
    ).unwrap();

    pub static ref REPUTATION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "simrep_reputation_failures_total",
        "Total number of per-category failures while applying actions",
        &["category", "error_type"]
    ).unwrap();
}

/// Metrics hook backed by the process-wide Prometheus registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusReputationMetrics;

impl ReputationMetricsHook for PrometheusReputationMetrics {
    fn sim_registered(&self, _sim: SimId) {
        REPUTATION_REGISTERED_SIMS.inc();
    }

    fn points_updated(&self, _sim: SimId, update: &CategoryUpdate) {
        let clamped = if update.clamped() { "true" } else { "false" };
        REPUTATION_UPDATES_TOTAL
            .with_label_values(&[update.category.as_str(), clamped])
            .inc();
    }

    fn category_failed(&self, _sim: SimId, category: &CategoryKey, error: &ReputationError) {
        REPUTATION_FAILURES_TOTAL
            .with_label_values(&[category.as_str(), error.kind()])
            .inc();
    }
}
