use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::domain::{Decision, Outcome};
use crate::rules::{CREDIT_SCORE_RULE_ID, DTI_RULE_ID};

/// Metrics registry for the service.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Applications evaluated (simulated or saved)
    pub evaluations_total: AtomicU64,

    /// Evaluations by outcome
    pub evaluations_approved: AtomicU64,
    pub evaluations_declined_credit: AtomicU64,
    pub evaluations_declined_dti: AtomicU64,

    /// Records written to the store
    pub applications_created_total: AtomicU64,

    /// Requests rejected by the API key guard
    pub auth_denied_total: AtomicU64,

    /// Requests rejected by input validation
    pub validation_errors_total: AtomicU64,

    /// Storage failures surfaced as server errors
    pub storage_errors_total: AtomicU64,

    /// Handler latency buckets
    pub latency_under_1ms: AtomicU64,
    pub latency_1_5ms: AtomicU64,
    pub latency_5_10ms: AtomicU64,
    pub latency_10_50ms: AtomicU64,
    pub latency_50_100ms: AtomicU64,
    pub latency_over_100ms: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        MetricsRegistry::default()
    }

    /// Record an evaluation outcome.
    pub fn record_decision(&self, decision: &Decision) {
        self.evaluations_total.fetch_add(1, Ordering::Relaxed);

        match (decision.outcome, decision.rule_id.as_deref()) {
            (Outcome::Approved, _) => {
                self.evaluations_approved.fetch_add(1, Ordering::Relaxed);
            }
            (Outcome::Declined, Some(CREDIT_SCORE_RULE_ID)) => {
                self.evaluations_declined_credit
                    .fetch_add(1, Ordering::Relaxed);
            }
            (Outcome::Declined, Some(DTI_RULE_ID)) => {
                self.evaluations_declined_dti.fetch_add(1, Ordering::Relaxed);
            }
            // Custom rule sets only count towards the total.
            (Outcome::Declined, _) => {}
        }
    }

    pub fn record_created(&self) {
        self.applications_created_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_auth_denied(&self) {
        self.auth_denied_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_validation_error(&self) {
        self.validation_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_storage_error(&self) {
        self.storage_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record handler latency.
    pub fn record_latency(&self, start: Instant) {
        let micros = start.elapsed().as_micros() as u64;

        if micros < 1000 {
            self.latency_under_1ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 5000 {
            self.latency_1_5ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 10000 {
            self.latency_5_10ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 50000 {
            self.latency_10_50ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 100000 {
            self.latency_50_100ms.fetch_add(1, Ordering::Relaxed);
        } else {
            self.latency_over_100ms.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self, uptime_secs: u64) -> String {
        format!(
            r#"# HELP preapproval_uptime_seconds Service uptime in seconds
# TYPE preapproval_uptime_seconds counter
preapproval_uptime_seconds {}

# HELP preapproval_evaluations_total Applications evaluated
# TYPE preapproval_evaluations_total counter
preapproval_evaluations_total {}

# HELP preapproval_evaluations Evaluations by outcome
# TYPE preapproval_evaluations counter
preapproval_evaluations{{outcome="approved"}} {}
preapproval_evaluations{{outcome="declined",reason="credit_score"}} {}
preapproval_evaluations{{outcome="declined",reason="dti"}} {}

# HELP preapproval_applications_created_total Applications persisted
# TYPE preapproval_applications_created_total counter
preapproval_applications_created_total {}

# HELP preapproval_auth_denied_total Requests denied by the API key guard
# TYPE preapproval_auth_denied_total counter
preapproval_auth_denied_total {}

# HELP preapproval_validation_errors_total Requests rejected by validation
# TYPE preapproval_validation_errors_total counter
preapproval_validation_errors_total {}

# HELP preapproval_storage_errors_total Storage failures
# TYPE preapproval_storage_errors_total counter
preapproval_storage_errors_total {}

# HELP preapproval_request_latency_bucket Handler latency histogram
# TYPE preapproval_request_latency_bucket counter
preapproval_request_latency_bucket{{le="0.001"}} {}
preapproval_request_latency_bucket{{le="0.005"}} {}
preapproval_request_latency_bucket{{le="0.01"}} {}
preapproval_request_latency_bucket{{le="0.05"}} {}
preapproval_request_latency_bucket{{le="0.1"}} {}
preapproval_request_latency_bucket{{le="+Inf"}} {}
"#,
            uptime_secs,
            self.evaluations_total.load(Ordering::Relaxed),
            self.evaluations_approved.load(Ordering::Relaxed),
            self.evaluations_declined_credit.load(Ordering::Relaxed),
            self.evaluations_declined_dti.load(Ordering::Relaxed),
            self.applications_created_total.load(Ordering::Relaxed),
            self.auth_denied_total.load(Ordering::Relaxed),
            self.validation_errors_total.load(Ordering::Relaxed),
            self.storage_errors_total.load(Ordering::Relaxed),
            self.latency_under_1ms.load(Ordering::Relaxed),
            self.latency_1_5ms.load(Ordering::Relaxed),
            self.latency_5_10ms.load(Ordering::Relaxed),
            self.latency_10_50ms.load(Ordering::Relaxed),
            self.latency_50_100ms.load(Ordering::Relaxed),
            self.latency_over_100ms.load(Ordering::Relaxed),
        )
    }
}

/// Records handler latency when dropped.
pub struct TimingGuard<'a> {
    registry: &'a MetricsRegistry,
    start: Instant,
}

impl<'a> TimingGuard<'a> {
    pub fn new(registry: &'a MetricsRegistry) -> Self {
        TimingGuard {
            registry,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for TimingGuard<'a> {
    fn drop(&mut self) {
        self.registry.record_latency(self.start);
    }
}
