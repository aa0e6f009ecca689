//! Provisioning counters.

use std::net::SocketAddr;

use ::metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::ObservabilityError;

pub const PROVISION_REQUESTS: &str = "provisioner_provision_requests_total";
pub const PROVISION_FAILURES: &str = "provisioner_provision_failures_total";
pub const PROVISIONED_RESOURCES: &str = "provisioner_provisioned_resources_total";

/// Handle for recording provisioning metrics.
///
/// Recording without an installed recorder is a no-op, so tests and the CLI
/// can use this freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvisionerMetrics;

impl ProvisionerMetrics {
    pub fn new() -> Self {
        describe_counter!(PROVISION_REQUESTS, "Provisioning requests received");
        describe_counter!(PROVISION_FAILURES, "Provisioning requests rejected, by reason");
        describe_counter!(PROVISIONED_RESOURCES, "Resources appended to the provisioned log, by kind");
        Self
    }

    pub fn record_request(&self) {
        counter!(PROVISION_REQUESTS).increment(1);
    }

    pub fn record_failure(&self, reason: &'static str) {
        counter!(PROVISION_FAILURES, "reason" => reason).increment(1);
    }

    pub fn record_provisioned(&self, kind: &'static str) {
        counter!(PROVISIONED_RESOURCES, "kind" => kind).increment(1);
    }
}

/// Serve metrics in Prometheus text format on `addr`.
///
/// Must be called from inside a Tokio runtime.
pub fn install_prometheus(addr: SocketAddr) -> Result<(), ObservabilityError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ObservabilityError::Exporter(e.to_string()))?;
    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}
