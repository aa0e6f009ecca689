//! In-memory template registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use provisioner_shared_types::{NetworkTemplate, ResourceKind, StorageTemplate, Template, VmTemplate};

use crate::error::RegistryError;

/// Named templates, one map per resource kind.
///
/// Stored templates are never handed out directly: every read returns a
/// fresh clone with its own id.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    vms: HashMap<String, VmTemplate>,
    networks: HashMap<String, NetworkTemplate>,
    storages: HashMap<String, StorageTemplate>,
}

/// Registered keys per kind, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateKeys {
    pub vms: Vec<String>,
    pub networks: Vec<String>,
    pub storages: Vec<String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the VM template at `key`.
    pub fn register_vm(&mut self, key: impl Into<String>, template: VmTemplate) {
        self.vms.insert(key.into(), template);
    }

    pub fn register_network(&mut self, key: impl Into<String>, template: NetworkTemplate) {
        self.networks.insert(key.into(), template);
    }

    pub fn register_storage(&mut self, key: impl Into<String>, template: StorageTemplate) {
        self.storages.insert(key.into(), template);
    }

    pub fn vm_clone(&self, key: &str) -> Result<VmTemplate, RegistryError> {
        clone_from(&self.vms, key)
    }

    pub fn network_clone(&self, key: &str) -> Result<NetworkTemplate, RegistryError> {
        clone_from(&self.networks, key)
    }

    pub fn storage_clone(&self, key: &str) -> Result<StorageTemplate, RegistryError> {
        clone_from(&self.storages, key)
    }

    pub fn keys(&self) -> TemplateKeys {
        TemplateKeys {
            vms: sorted_keys(&self.vms),
            networks: sorted_keys(&self.networks),
            storages: sorted_keys(&self.storages),
        }
    }

    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Vm => self.vms.len(),
            ResourceKind::Network => self.networks.len(),
            ResourceKind::Storage => self.storages.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vms.is_empty() && self.networks.is_empty() && self.storages.is_empty()
    }
}

fn clone_from<T: Template>(templates: &HashMap<String, T>, key: &str) -> Result<T, RegistryError> {
    let template = templates.get(key).ok_or_else(|| RegistryError::NotFound {
        kind: T::KIND,
        key: key.to_string(),
    })?;
    let copy = template.clone_fresh();
    debug!(kind = %T::KIND, key, id = %copy.id(), "Cloned template");
    Ok(copy)
}

fn sorted_keys<T>(templates: &HashMap<String, T>) -> Vec<String> {
    let mut keys: Vec<String> = templates.keys().cloned().collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_not_found() {
        let registry = TemplateRegistry::new();

        let err = registry.vm_clone("aws-standard").unwrap_err();
        assert_eq!(
            err,
            RegistryError::NotFound {
                kind: ResourceKind::Vm,
                key: "aws-standard".to_string()
            }
        );
        assert!(registry.network_clone("aws-standard-net").is_err());
        assert!(registry.storage_clone("aws-standard-store").is_err());
    }

    #[test]
    fn test_clone_does_not_return_stored_instance() {
        let mut registry = TemplateRegistry::new();
        let template = VmTemplate::new("aws", "aws-standard", 2, 4, 50);
        let stored_id = template.id.clone();
        registry.register_vm("aws-standard", template);

        let first = registry.vm_clone("aws-standard").unwrap();
        let second = registry.vm_clone("aws-standard").unwrap();

        assert_ne!(first.id, stored_id);
        assert_ne!(first.id, second.id);
        assert_eq!(first.name, second.name);
    }

    #[test]
    fn test_register_overwrites_existing_key() {
        let mut registry = TemplateRegistry::new();
        registry.register_storage("disk", StorageTemplate::new("aws", 50, None, false));
        registry.register_storage("disk", StorageTemplate::new("gcp", 200, Some(500), true));

        let copy = registry.storage_clone("disk").unwrap();
        assert_eq!(copy.provider, "gcp");
        assert_eq!(registry.len(ResourceKind::Storage), 1);
    }

    #[test]
    fn test_keys_are_independent_per_kind() {
        let mut registry = TemplateRegistry::new();
        registry.register_vm("shared", VmTemplate::new("aws", "a", 1, 1, 1));
        registry.register_network("shared", NetworkTemplate::new("aws", "us-east-1", false, vec![]));

        let keys = registry.keys();
        assert_eq!(keys.vms, vec!["shared"]);
        assert_eq!(keys.networks, vec!["shared"]);
        assert!(keys.storages.is_empty());
    }
}
