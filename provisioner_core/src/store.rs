//! Append-only log of provisioned resources.

use serde::{Deserialize, Serialize};

use provisioner_shared_types::{NetworkTemplate, ResourceKind, StorageTemplate, VmTemplate};

use crate::provisioning::ProvisionedSet;

/// Everything provisioned so far, grouped by kind in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedSnapshot {
    pub vms: Vec<VmTemplate>,
    pub networks: Vec<NetworkTemplate>,
    pub storages: Vec<StorageTemplate>,
}

#[derive(Debug, Default)]
pub struct ProvisionedStore {
    log: ProvisionedSnapshot,
}

impl ProvisionedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one provisioned set: network, then storage, then VM.
    pub fn record(&mut self, set: &ProvisionedSet) {
        self.log.networks.push(set.network.clone());
        self.log.storages.push(set.storage.clone());
        self.log.vms.push(set.vm.clone());
    }

    pub fn list(&self) -> ProvisionedSnapshot {
        self.log.clone()
    }

    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Vm => self.log.vms.len(),
            ResourceKind::Network => self.log.networks.len(),
            ResourceKind::Storage => self.log.storages.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.log.vms.is_empty() && self.log.networks.is_empty() && self.log.storages.is_empty()
    }
}
