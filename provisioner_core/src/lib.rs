//! Core of the prototype provisioner.
//!
//! ```text
//! ProvisionRequest ──► Provisioner ──► TemplateRegistry (clone on read)
//!                          │
//!                          └──► ProvisionedStore (append only)
//! ```
//!
//! Nothing here performs I/O except [`seed::SeedTable::from_file`]; the HTTP
//! layer owns the locking around the registry and the store.

pub mod error;
pub mod provisioning;
pub mod registry;
pub mod seed;
pub mod store;

pub use error::{ProvisionError, RegistryError, SeedError};
pub use provisioning::{
    associated_keys, ProvisionRequest, ProvisionResponse, ProvisionedSet, Provisioner, STATUS_PROVISIONED,
};
pub use registry::{TemplateKeys, TemplateRegistry};
pub use seed::SeedTable;
pub use store::{ProvisionedSnapshot, ProvisionedStore};
