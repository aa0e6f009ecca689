//! Observability for the prototype provisioner.
//!
//! - **Tracing**: structured logging through `tracing-subscriber`
//! - **Metrics**: counters recorded with `metrics`, optionally exported in
//!   Prometheus format
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │            Observability Layer            │
//! ├─────────────────────┬─────────────────────┤
//! │       Tracing       │       Metrics       │
//! │   (tracing + fmt    │    (metrics +       │
//! │    subscriber)      │    prometheus)      │
//! ├─────────────────────┴─────────────────────┤
//! │          provisioner_api / core           │
//! └───────────────────────────────────────────┘
//! ```

pub mod metrics;
pub mod tracing_setup;

pub use self::metrics::{install_prometheus, ProvisionerMetrics};
pub use tracing_setup::{init_tracing, TracingConfig};

/// Errors raised while installing subscribers or exporters.
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("Tracing subscriber already installed: {0}")]
    SubscriberInstalled(String),

    #[error("Metrics exporter failed: {0}")]
    Exporter(String),
}
