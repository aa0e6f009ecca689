//! Error types for the provisioner core.

use std::path::PathBuf;

use provisioner_shared_types::ResourceKind;
use thiserror::Error;

/// Registry lookup errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{kind} template not found: {key}")]
    NotFound { kind: ResourceKind, key: String },
}

/// Errors surfaced by a provisioning request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    /// The requested VM template key is not registered.
    #[error("VM template {0} not found")]
    TemplateNotFound(String),

    /// A network or storage key derived from the VM key is not registered.
    #[error("Associated template not found: '{0}'")]
    AssociatedNotFound(String),

    #[error("Incoherent provider between VM, Network and Storage")]
    IncoherentProvider,
}

impl ProvisionError {
    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            ProvisionError::TemplateNotFound(_) => "template_not_found",
            ProvisionError::AssociatedNotFound(_) => "associated_not_found",
            ProvisionError::IncoherentProvider => "incoherent_provider",
        }
    }
}

/// Seed loading errors.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Duplicate {kind} key in seed: {key}")]
    DuplicateKey { kind: ResourceKind, key: String },
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;
