//! Template entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::overrides::{assign, NetworkField, OverridePolicy, Overrides, StorageField, VmField};
use crate::{new_resource_id, ModelError, ResourceId};

/// The three kinds of resource a template can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Vm,
    Network,
    Storage,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Vm, ResourceKind::Network, ResourceKind::Storage];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Vm => "vm",
            ResourceKind::Network => "network",
            ResourceKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vm" | "vms" => Ok(ResourceKind::Vm),
            "network" | "networks" | "net" => Ok(ResourceKind::Network),
            "storage" | "storages" | "store" => Ok(ResourceKind::Storage),
            _ => Err(ModelError::UnknownKind(s.to_string())),
        }
    }
}

/// Behaviour shared by every template variant.
pub trait Template: Clone + Serialize + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> &str;

    fn provider(&self) -> &str;

    /// Deep copy with a freshly generated id. All other fields are copied by value.
    fn clone_fresh(&self) -> Self;

    /// Replace every known field named in `overrides`. Unknown names are ignored.
    fn apply_overrides(&mut self, overrides: &Overrides, policy: OverridePolicy);
}

/// Virtual machine template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmTemplate {
    pub id: ResourceId,
    pub provider: String,
    pub name: String,
    pub vcpus: Number,
    pub memory_gb: Number,
    pub disk_gb: Number,
    pub network_id: Option<String>,
    pub storage_id: Option<String>,
}

impl VmTemplate {
    pub fn new(
        provider: impl Into<String>,
        name: impl Into<String>,
        vcpus: u32,
        memory_gb: u32,
        disk_gb: u32,
    ) -> Self {
        Self {
            id: new_resource_id(),
            provider: provider.into(),
            name: name.into(),
            vcpus: vcpus.into(),
            memory_gb: memory_gb.into(),
            disk_gb: disk_gb.into(),
            network_id: None,
            storage_id: None,
        }
    }
}

impl Template for VmTemplate {
    const KIND: ResourceKind = ResourceKind::Vm;

    fn id(&self) -> &str {
        &self.id
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn clone_fresh(&self) -> Self {
        Self {
            id: new_resource_id(),
            ..self.clone()
        }
    }

    fn apply_overrides(&mut self, overrides: &Overrides, policy: OverridePolicy) {
        for (name, value) in overrides {
            let Some(field) = VmField::from_name(name) else {
                continue;
            };
            if field == VmField::Id && policy.lock_identifiers {
                continue;
            }
            match field {
                VmField::Id => assign(&mut self.id, Self::KIND, name, value),
                VmField::Provider => assign(&mut self.provider, Self::KIND, name, value),
                VmField::Name => assign(&mut self.name, Self::KIND, name, value),
                VmField::Vcpus => assign(&mut self.vcpus, Self::KIND, name, value),
                VmField::MemoryGb => assign(&mut self.memory_gb, Self::KIND, name, value),
                VmField::DiskGb => assign(&mut self.disk_gb, Self::KIND, name, value),
                VmField::NetworkId => assign(&mut self.network_id, Self::KIND, name, value),
                VmField::StorageId => assign(&mut self.storage_id, Self::KIND, name, value),
            }
        }
    }
}

/// Network template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTemplate {
    pub id: ResourceId,
    pub provider: String,
    pub region: String,
    pub public_ip: bool,
    pub firewall_rules: Vec<String>,
}

impl NetworkTemplate {
    pub fn new(
        provider: impl Into<String>,
        region: impl Into<String>,
        public_ip: bool,
        firewall_rules: Vec<String>,
    ) -> Self {
        Self {
            id: new_resource_id(),
            provider: provider.into(),
            region: region.into(),
            public_ip,
            firewall_rules,
        }
    }
}

impl Template for NetworkTemplate {
    const KIND: ResourceKind = ResourceKind::Network;

    fn id(&self) -> &str {
        &self.id
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn clone_fresh(&self) -> Self {
        Self {
            id: new_resource_id(),
            ..self.clone()
        }
    }

    fn apply_overrides(&mut self, overrides: &Overrides, policy: OverridePolicy) {
        for (name, value) in overrides {
            let Some(field) = NetworkField::from_name(name) else {
                continue;
            };
            if field == NetworkField::Id && policy.lock_identifiers {
                continue;
            }
            match field {
                NetworkField::Id => assign(&mut self.id, Self::KIND, name, value),
                NetworkField::Provider => assign(&mut self.provider, Self::KIND, name, value),
                NetworkField::Region => assign(&mut self.region, Self::KIND, name, value),
                NetworkField::PublicIp => assign(&mut self.public_ip, Self::KIND, name, value),
                NetworkField::FirewallRules => {
                    assign(&mut self.firewall_rules, Self::KIND, name, value)
                }
            }
        }
    }
}

/// Storage volume template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageTemplate {
    pub id: ResourceId,
    pub provider: String,
    pub size_gb: Number,
    pub iops: Option<Number>,
    pub encrypted: bool,
}

impl StorageTemplate {
    pub fn new(provider: impl Into<String>, size_gb: u32, iops: Option<u32>, encrypted: bool) -> Self {
        Self {
            id: new_resource_id(),
            provider: provider.into(),
            size_gb: size_gb.into(),
            iops: iops.map(Number::from),
            encrypted,
        }
    }
}

impl Template for StorageTemplate {
    const KIND: ResourceKind = ResourceKind::Storage;

    fn id(&self) -> &str {
        &self.id
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn clone_fresh(&self) -> Self {
        Self {
            id: new_resource_id(),
            ..self.clone()
        }
    }

    fn apply_overrides(&mut self, overrides: &Overrides, policy: OverridePolicy) {
        for (name, value) in overrides {
            let Some(field) = StorageField::from_name(name) else {
                continue;
            };
            if field == StorageField::Id && policy.lock_identifiers {
                continue;
            }
            match field {
                StorageField::Id => assign(&mut self.id, Self::KIND, name, value),
                StorageField::Provider => assign(&mut self.provider, Self::KIND, name, value),
                StorageField::SizeGb => assign(&mut self.size_gb, Self::KIND, name, value),
                StorageField::Iops => assign(&mut self.iops, Self::KIND, name, value),
                StorageField::Encrypted => assign(&mut self.encrypted, Self::KIND, name, value),
            }
        }
    }
}
