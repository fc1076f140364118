//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes only the counters the dossier service reports on.

use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Outcome label recorded for each partial update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcomeLabel {
    /// Update and audit path completed.
    Updated,
    /// Request payload failed validation.
    Invalid,
    /// Caller identity could not be resolved.
    Unauthenticated,
    /// Search returned no dossier.
    NotFound,
    /// Search collaborator failed.
    LookupFailed,
    /// Dossier was already closed.
    Closed,
    /// Policy decision was not permit.
    Denied,
    /// Policy collaborator failed.
    AuthorizationFailed,
    /// Content repository rejected the update.
    UpdateFailed,
}

impl UpdateOutcomeLabel {
    /// Every outcome, success first.
    pub const ALL: [Self; 9] = [
        Self::Updated,
        Self::Invalid,
        Self::Unauthenticated,
        Self::NotFound,
        Self::LookupFailed,
        Self::Closed,
        Self::Denied,
        Self::AuthorizationFailed,
        Self::UpdateFailed,
    ];

    /// Label value used in the `outcome` dimension.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Invalid => "invalid",
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not_found",
            Self::LookupFailed => "lookup_failed",
            Self::Closed => "closed",
            Self::Denied => "denied",
            Self::AuthorizationFailed => "authorization_failed",
            Self::UpdateFailed => "update_failed",
        }
    }
}

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    dossier_updates_total: IntCounterVec,
    audit_failures_total: IntCounter,
}

/// Snapshot of selected counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Successful partial updates.
    pub dossier_updates_succeeded: u64,
    /// Partial updates rejected or failed for any reason.
    pub dossier_updates_rejected: u64,
    /// Audit writes that failed after a successful update.
    pub audit_failures_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be built or
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "http_requests_total",
            source,
        })?;
        let dossier_updates_total = IntCounterVec::new(
            Opts::new(
                "dossier_updates_total",
                "Dossier partial update attempts by outcome",
            ),
            &["outcome"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "dossier_updates_total",
            source,
        })?;
        let audit_failures_total = IntCounter::with_opts(Opts::new(
            "audit_failures_total",
            "Audit writes that failed after a successful update",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "audit_failures_total",
            source,
        })?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "dossier_updates_total", &dossier_updates_total)?;
        register(&registry, "audit_failures_total", &audit_failures_total)?;

        // Every outcome series exists from the start, so reads never add series.
        for outcome in UpdateOutcomeLabel::ALL {
            dossier_updates_total
                .with_label_values(&[outcome.as_str()])
                .reset();
        }

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                dossier_updates_total,
                audit_failures_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Increment the partial update counter for the given outcome.
    pub fn inc_dossier_update(&self, outcome: UpdateOutcomeLabel) {
        self.inner
            .dossier_updates_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Increment the audit failure counter.
    pub fn inc_audit_failure(&self) {
        self.inner.audit_failures_total.inc();
    }

    /// Read the partial update counter for a single outcome.
    ///
    /// Every outcome series is registered at construction, so reading never
    /// changes the exported series set.
    #[must_use]
    pub fn dossier_updates(&self, outcome: UpdateOutcomeLabel) -> u64 {
        self.inner
            .dossier_updates_total
            .with_label_values(&[outcome.as_str()])
            .get()
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the update counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let succeeded = self.dossier_updates(UpdateOutcomeLabel::Updated);
        let rejected = UpdateOutcomeLabel::ALL
            .into_iter()
            .filter(|outcome| *outcome != UpdateOutcomeLabel::Updated)
            .map(|outcome| self.dossier_updates(outcome))
            .sum();
        MetricsSnapshot {
            dossier_updates_succeeded: succeeded,
            dossier_updates_rejected: rejected,
            audit_failures_total: self.inner.audit_failures_total.get(),
        }
    }
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}
