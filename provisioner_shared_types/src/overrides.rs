//! Field-level overrides.
//!
//! Overrides arrive as a loose JSON object. Each template variant enumerates
//! the field names it accepts; names outside that list are ignored. Values
//! are not checked against any business rule: identifiers take any string and
//! numeric fields take any JSON number, negative or fractional. A value of a
//! different JSON type (a string for `vcpus`, a number for `region`) still
//! cannot be stored and is skipped.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::template::ResourceKind;

/// Field name -> replacement value.
pub type Overrides = serde_json::Map<String, Value>;

/// Controls which fields an override may touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverridePolicy {
    /// Ignore `id` overrides instead of applying them.
    pub lock_identifiers: bool,
}

/// Overridable VM fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmField {
    Id,
    Provider,
    Name,
    Vcpus,
    MemoryGb,
    DiskGb,
    NetworkId,
    StorageId,
}

impl VmField {
    pub const ALL: [VmField; 8] = [
        VmField::Id,
        VmField::Provider,
        VmField::Name,
        VmField::Vcpus,
        VmField::MemoryGb,
        VmField::DiskGb,
        VmField::NetworkId,
        VmField::StorageId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VmField::Id => "id",
            VmField::Provider => "provider",
            VmField::Name => "name",
            VmField::Vcpus => "vcpus",
            VmField::MemoryGb => "memory_gb",
            VmField::DiskGb => "disk_gb",
            VmField::NetworkId => "network_id",
            VmField::StorageId => "storage_id",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// Overridable network fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkField {
    Id,
    Provider,
    Region,
    PublicIp,
    FirewallRules,
}

impl NetworkField {
    pub const ALL: [NetworkField; 5] = [
        NetworkField::Id,
        NetworkField::Provider,
        NetworkField::Region,
        NetworkField::PublicIp,
        NetworkField::FirewallRules,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NetworkField::Id => "id",
            NetworkField::Provider => "provider",
            NetworkField::Region => "region",
            NetworkField::PublicIp => "public_ip",
            NetworkField::FirewallRules => "firewall_rules",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// Overridable storage fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageField {
    Id,
    Provider,
    SizeGb,
    Iops,
    Encrypted,
}

impl StorageField {
    pub const ALL: [StorageField; 5] = [
        StorageField::Id,
        StorageField::Provider,
        StorageField::SizeGb,
        StorageField::Iops,
        StorageField::Encrypted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StorageField::Id => "id",
            StorageField::Provider => "provider",
            StorageField::SizeGb => "size_gb",
            StorageField::Iops => "iops",
            StorageField::Encrypted => "encrypted",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// Write `value` into `slot` when it fits the slot's type.
///
/// A value of the wrong shape leaves the slot untouched and is only logged.
pub(crate) fn assign<T: DeserializeOwned>(slot: &mut T, kind: ResourceKind, field: &str, value: &Value) {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => *slot = parsed,
        Err(err) => {
            warn!(%kind, field, %value, error = %err, "Skipping override with mismatched value shape");
        }
    }
}
