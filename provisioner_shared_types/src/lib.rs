//! Shared types for the prototype provisioner.
//!
//! Three template shapes live here (VM, network and storage) together with
//! the clone and override semantics every provisioned resource goes through:
//!
//! - [`Template::clone_fresh`] produces an independent copy with a new id.
//! - [`Template::apply_overrides`] replaces known fields by name and ignores
//!   everything else.

pub mod overrides;
pub mod template;

pub use overrides::{NetworkField, OverridePolicy, Overrides, StorageField, VmField};
pub use template::{NetworkTemplate, ResourceKind, StorageTemplate, Template, VmTemplate};

/// Identifier carried by every template and provisioned resource.
///
/// Generated ids are UUID v4 strings, but an `id` override may store any string.
pub type ResourceId = String;

/// Fresh UUID v4 identifier in its hyphenated string form.
pub fn new_resource_id() -> ResourceId {
    uuid::Uuid::new_v4().to_string()
}

/// Errors produced when parsing user-facing names into model types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),
}
