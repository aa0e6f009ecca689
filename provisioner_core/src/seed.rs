//! Initial template set.
//!
//! The registry starts from a [`SeedTable`]: either the built-in table or
//! one read from a TOML file with `[[vm]]`, `[[network]]` and `[[storage]]`
//! entries. Entries carry no id; every template gets a fresh one when it is
//! registered.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use provisioner_shared_types::{NetworkTemplate, ResourceKind, StorageTemplate, VmTemplate};

use crate::error::SeedError;
use crate::registry::TemplateRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmSeed {
    pub key: String,
    pub provider: String,
    pub name: String,
    pub vcpus: u32,
    pub memory_gb: u32,
    pub disk_gb: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSeed {
    pub key: String,
    pub provider: String,
    pub region: String,
    #[serde(default)]
    pub public_ip: bool,
    #[serde(default)]
    pub firewall_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSeed {
    pub key: String,
    pub provider: String,
    pub size_gb: u32,
    #[serde(default)]
    pub iops: Option<u32>,
    #[serde(default)]
    pub encrypted: bool,
}

/// A full set of templates to register at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTable {
    #[serde(default)]
    pub vm: Vec<VmSeed>,
    #[serde(default)]
    pub network: Vec<NetworkSeed>,
    #[serde(default)]
    pub storage: Vec<StorageSeed>,
}

impl SeedTable {
    /// The two stock template triples: `aws-standard` and `gcp-memopt`.
    pub fn builtin() -> Self {
        Self {
            vm: vec![
                VmSeed {
                    key: "aws-standard".into(),
                    provider: "aws".into(),
                    name: "aws-standard".into(),
                    vcpus: 2,
                    memory_gb: 4,
                    disk_gb: 50,
                },
                VmSeed {
                    key: "gcp-memopt".into(),
                    provider: "gcp".into(),
                    name: "gcp-memopt".into(),
                    vcpus: 4,
                    memory_gb: 32,
                    disk_gb: 100,
                },
            ],
            network: vec![
                NetworkSeed {
                    key: "aws-standard-net".into(),
                    provider: "aws".into(),
                    region: "us-east-1".into(),
                    public_ip: true,
                    firewall_rules: vec!["SSH".into(), "HTTP".into()],
                },
                NetworkSeed {
                    key: "gcp-memopt-net".into(),
                    provider: "gcp".into(),
                    region: "us-central1".into(),
                    public_ip: false,
                    firewall_rules: vec!["SSH".into()],
                },
            ],
            storage: vec![
                StorageSeed {
                    key: "aws-standard-store".into(),
                    provider: "aws".into(),
                    size_gb: 50,
                    iops: Some(100),
                    encrypted: true,
                },
                StorageSeed {
                    key: "gcp-memopt-store".into(),
                    provider: "gcp".into(),
                    size_gb: 100,
                    iops: Some(300),
                    encrypted: false,
                },
            ],
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Register every entry. Keys must be unique within a kind.
    pub fn apply(&self, registry: &mut TemplateRegistry) -> Result<(), SeedError> {
        check_unique(ResourceKind::Vm, self.vm.iter().map(|s| s.key.as_str()))?;
        check_unique(ResourceKind::Network, self.network.iter().map(|s| s.key.as_str()))?;
        check_unique(ResourceKind::Storage, self.storage.iter().map(|s| s.key.as_str()))?;

        for seed in &self.vm {
            registry.register_vm(
                seed.key.clone(),
                VmTemplate::new(
                    seed.provider.clone(),
                    seed.name.clone(),
                    seed.vcpus,
                    seed.memory_gb,
                    seed.disk_gb,
                ),
            );
        }
        for seed in &self.network {
            registry.register_network(
                seed.key.clone(),
                NetworkTemplate::new(
                    seed.provider.clone(),
                    seed.region.clone(),
                    seed.public_ip,
                    seed.firewall_rules.clone(),
                ),
            );
        }
        for seed in &self.storage {
            registry.register_storage(
                seed.key.clone(),
                StorageTemplate::new(seed.provider.clone(), seed.size_gb, seed.iops, seed.encrypted),
            );
        }

        info!(
            vms = self.vm.len(),
            networks = self.network.len(),
            storages = self.storage.len(),
            "Seeded template registry"
        );
        Ok(())
    }

    pub fn into_registry(self) -> Result<TemplateRegistry, SeedError> {
        let mut registry = TemplateRegistry::new();
        self.apply(&mut registry)?;
        Ok(registry)
    }
}

fn check_unique<'a>(kind: ResourceKind, keys: impl Iterator<Item = &'a str>) -> Result<(), SeedError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(SeedError::DuplicateKey {
                kind,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}
