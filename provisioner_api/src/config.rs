//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use observability::TracingConfig;
use provisioner_core::{Provisioner, SeedError, SeedTable, TemplateRegistry};
use provisioner_shared_types::OverridePolicy;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP API binds to.
    pub listen_addr: SocketAddr,
    /// TOML seed file replacing the built-in templates.
    pub seed_file: Option<PathBuf>,
    /// Ignore `id` in override payloads.
    pub lock_identifiers: bool,
    /// Prometheus exporter address, disabled when unset.
    pub metrics_addr: Option<SocketAddr>,
    pub tracing: TracingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            seed_file: None,
            lock_identifiers: false,
            metrics_addr: None,
            tracing: TracingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn seed_table(&self) -> Result<SeedTable, SeedError> {
        match &self.seed_file {
            Some(path) => SeedTable::from_file(path),
            None => Ok(SeedTable::builtin()),
        }
    }

    pub fn load_registry(&self) -> Result<TemplateRegistry, SeedError> {
        self.seed_table()?.into_registry()
    }

    pub fn provisioner(&self) -> Provisioner {
        Provisioner::new(OverridePolicy {
            lock_identifiers: self.lock_identifiers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_addr_matches_constant() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().unwrap());
        assert!(config.metrics_addr.is_none());
    }

    #[test]
    fn test_default_config_loads_builtin_registry() {
        let registry = ServerConfig::default().load_registry().unwrap();
        assert!(registry.vm_clone("aws-standard").is_ok());
    }

    #[test]
    fn test_lock_identifiers_reaches_policy() {
        let config = ServerConfig {
            lock_identifiers: true,
            ..ServerConfig::default()
        };
        assert!(config.provisioner().policy().lock_identifiers);
    }

    #[test]
    fn test_missing_seed_file_fails() {
        let config = ServerConfig {
            seed_file: Some(PathBuf::from("/nonexistent/seed.toml")),
            ..ServerConfig::default()
        };
        assert!(config.load_registry().is_err());
    }
}
