//! Provisioning orchestrator.
//!
//! A request names a VM template. The matching network and storage templates
//! are found by naming convention (`<key>-net`, `<key>-store`), all three are
//! cloned, overrides are applied, providers are checked for coherence and the
//! result is appended to the [`ProvisionedStore`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use provisioner_shared_types::{
    NetworkTemplate, OverridePolicy, Overrides, StorageTemplate, Template, VmTemplate,
};

use crate::error::{ProvisionError, ProvisionResult};
use crate::registry::TemplateRegistry;
use crate::store::ProvisionedStore;

const NETWORK_SUFFIX: &str = "-net";
const STORAGE_SUFFIX: &str = "-store";

pub const STATUS_PROVISIONED: &str = "provisioned";

/// A request to provision one VM with its network and storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    /// Provider the caller expects. Only recorded in logs.
    pub provider: String,
    pub template_key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overrides: Option<Overrides>,
    #[serde(default)]
    pub network_overrides: Option<Overrides>,
    #[serde(default)]
    pub storage_overrides: Option<Overrides>,
}

impl ProvisionRequest {
    pub fn new(provider: impl Into<String>, template_key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            template_key: template_key.into(),
            ..Self::default()
        }
    }
}

/// The three resources produced by one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedSet {
    pub vm: VmTemplate,
    pub network: NetworkTemplate,
    pub storage: StorageTemplate,
}

/// Wire body of a successful provisioning call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionResponse {
    pub status: String,
    pub vm: VmTemplate,
    pub network: NetworkTemplate,
    pub storage: StorageTemplate,
}

impl From<ProvisionedSet> for ProvisionResponse {
    fn from(set: ProvisionedSet) -> Self {
        ProvisionResponse {
            status: STATUS_PROVISIONED.to_string(),
            vm: set.vm,
            network: set.network,
            storage: set.storage,
        }
    }
}

/// Network and storage keys associated with a VM template key.
pub fn associated_keys(template_key: &str) -> (String, String) {
    (
        format!("{template_key}{NETWORK_SUFFIX}"),
        format!("{template_key}{STORAGE_SUFFIX}"),
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Provisioner {
    policy: OverridePolicy,
}

impl Provisioner {
    pub fn new(policy: OverridePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OverridePolicy {
        self.policy
    }

    /// Build the provisioned set without recording it.
    pub fn prepare(
        &self,
        registry: &TemplateRegistry,
        request: &ProvisionRequest,
    ) -> ProvisionResult<ProvisionedSet> {
        let mut vm = registry
            .vm_clone(&request.template_key)
            .map_err(|_| ProvisionError::TemplateNotFound(request.template_key.clone()))?;

        let (net_key, store_key) = associated_keys(&request.template_key);
        let mut network = registry
            .network_clone(&net_key)
            .map_err(|_| ProvisionError::AssociatedNotFound(net_key))?;
        let mut storage = registry
            .storage_clone(&store_key)
            .map_err(|_| ProvisionError::AssociatedNotFound(store_key))?;

        apply_non_empty(&mut vm, request.overrides.as_ref(), self.policy);
        apply_non_empty(&mut network, request.network_overrides.as_ref(), self.policy);
        apply_non_empty(&mut storage, request.storage_overrides.as_ref(), self.policy);

        if network.provider != vm.provider || storage.provider != vm.provider {
            debug!(
                vm = %vm.provider,
                network = %network.provider,
                storage = %storage.provider,
                "Provider mismatch after overrides"
            );
            return Err(ProvisionError::IncoherentProvider);
        }

        if let Some(name) = request.name.as_deref().filter(|name| !name.is_empty()) {
            vm.name = name.to_string();
        }

        Ok(ProvisionedSet { vm, network, storage })
    }

    /// Prepare the set and append it to `store`. On error the store is untouched.
    pub fn provision(
        &self,
        registry: &TemplateRegistry,
        store: &mut ProvisionedStore,
        request: &ProvisionRequest,
    ) -> ProvisionResult<ProvisionedSet> {
        let set = self.prepare(registry, request)?;
        store.record(&set);
        info!(
            template_key = %request.template_key,
            requested_provider = %request.provider,
            vm_id = %set.vm.id,
            network_id = %set.network.id,
            storage_id = %set.storage.id,
            "Provisioned resource set"
        );
        Ok(set)
    }
}

fn apply_non_empty<T: Template>(template: &mut T, overrides: Option<&Overrides>, policy: OverridePolicy) {
    if let Some(overrides) = overrides.filter(|o| !o.is_empty()) {
        template.apply_overrides(overrides, policy);
    }
}
