//! Tracing subscriber setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ObservabilityError;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    /// `RUST_LOG` wins over the configured level.
    pub fn env_filter(&self) -> Result<EnvFilter, ObservabilityError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.level).map_err(|e| ObservabilityError::InvalidFilter {
            filter: self.level.clone(),
            message: e.to_string(),
        })
    }
}

/// Install the global subscriber.
pub fn init_tracing(config: &TracingConfig) -> Result<(), ObservabilityError> {
    let env_filter = config.env_filter()?;

    let result = if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    result.map_err(|e| ObservabilityError::SubscriberInstalled(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json);
    }

    #[test]
    fn test_directive_filter_is_accepted() {
        let config = TracingConfig {
            level: "provisioner_api=debug,tower_http=info".to_string(),
            json: true,
        };
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_second_init_fails() {
        let config = TracingConfig::default();
        let _ = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(ObservabilityError::SubscriberInstalled(_))
        ));
    }
}
