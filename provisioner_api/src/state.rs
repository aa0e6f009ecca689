//! API server state.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use observability::ProvisionerMetrics;
use provisioner_core::{ProvisionedStore, Provisioner, SeedTable, SeedError, TemplateRegistry};

/// Shared state for the API server.
///
/// The registry is only read after start-up. The provisioned log is the one
/// piece of state requests mutate; appends go through its mutex.
#[derive(Clone)]
pub struct ApiState {
    /// Templates available for cloning.
    pub registry: Arc<RwLock<TemplateRegistry>>,
    /// Log of provisioned resources.
    pub store: Arc<Mutex<ProvisionedStore>>,
    /// Provisioning rules (override policy).
    pub provisioner: Provisioner,
    pub metrics: ProvisionerMetrics,
}

impl ApiState {
    /// Create new API state around an already seeded registry.
    pub fn new(registry: TemplateRegistry, provisioner: Provisioner) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            store: Arc::new(Mutex::new(ProvisionedStore::new())),
            provisioner,
            metrics: ProvisionerMetrics::new(),
        }
    }

    /// Create API state from the built-in seed table.
    pub fn with_builtin_seed() -> Result<Self, SeedError> {
        let registry = SeedTable::builtin().into_registry()?;
        Ok(Self::new(registry, Provisioner::default()))
    }
}
