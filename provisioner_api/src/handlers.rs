//! API request handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use provisioner_core::{ProvisionRequest, ProvisionResponse, ProvisionedSnapshot, TemplateKeys};
use provisioner_shared_types::ResourceKind;

use crate::error::{ApiError, ApiResult};
use crate::state::ApiState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ============================================================================
// Provisioning Handlers
// ============================================================================

/// Clone a template triple, apply overrides and record the result.
pub async fn provision(
    State(state): State<ApiState>,
    payload: Result<Json<ProvisionRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    state.metrics.record_request();

    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected provisioning body");
        state.metrics.record_failure("invalid_body");
        ApiError::from(rejection)
    })?;

    let registry = state.registry.read().await;
    let mut store = state.store.lock().await;

    let set = state
        .provisioner
        .provision(&registry, &mut store, &request)
        .map_err(|err| {
            warn!(template_key = %request.template_key, error = %err, "Provisioning rejected");
            state.metrics.record_failure(err.reason());
            ApiError::from(err)
        })?;

    for kind in ResourceKind::ALL {
        state.metrics.record_provisioned(kind.as_str());
    }

    let response: ProvisionResponse = set.into();
    Ok((StatusCode::CREATED, Json(response)))
}

/// List every provisioned resource, grouped by kind.
pub async fn list_provisioned(State(state): State<ApiState>) -> Json<ProvisionedSnapshot> {
    let store = state.store.lock().await;
    Json(store.list())
}

// ============================================================================
// Template Handlers
// ============================================================================

/// List registered template keys.
pub async fn list_templates(State(state): State<ApiState>) -> Json<TemplateKeys> {
    let registry = state.registry.read().await;
    Json(registry.keys())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
