//! Router construction.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::ApiState;

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/provision", post(handlers::provision))
        .route("/provisioned", get(handlers::list_provisioned))
        .route("/templates", get(handlers::list_templates))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use provisioner_core::{Provisioner, SeedTable};
    use provisioner_shared_types::{ResourceKind, VmTemplate};

    fn app() -> (Router, ApiState) {
        let state = ApiState::with_builtin_seed().unwrap();
        (build_router(state.clone()), state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn post_provision(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/provision")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    async fn logged(state: &ApiState) -> usize {
        state.store.lock().await.len(ResourceKind::Vm)
    }

    #[tokio::test]
    async fn provision_seeded_template_returns_created() {
        let (app, state) = app();

        for key in ["aws-standard", "gcp-memopt"] {
            let (status, body) = send(&app, post_provision(json!({"provider": "x", "template_key": key}))).await;

            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["status"], "provisioned");
            let provider = body["vm"]["provider"].clone();
            assert_eq!(body["network"]["provider"], provider);
            assert_eq!(body["storage"]["provider"], provider);
        }
        assert_eq!(logged(&state).await, 2);
    }

    #[tokio::test]
    async fn unknown_template_returns_not_found() {
        let (app, state) = app();

        let (status, body) = send(
            &app,
            post_provision(json!({"provider": "aws", "template_key": "aws-huge"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "VM template aws-huge not found");
        assert_eq!(logged(&state).await, 0);
    }

    #[tokio::test]
    async fn vm_without_associated_templates_returns_not_found() {
        let mut registry = SeedTable::builtin().into_registry().unwrap();
        registry.register_vm("orphan", VmTemplate::new("aws", "orphan", 1, 2, 10));
        let state = ApiState::new(registry, Provisioner::default());
        let app = build_router(state.clone());

        let (status, body) = send(
            &app,
            post_provision(json!({"provider": "aws", "template_key": "orphan"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Associated template not found: 'orphan-net'");
        assert_eq!(logged(&state).await, 0);
    }

    #[tokio::test]
    async fn incoherent_network_provider_returns_bad_request() {
        let (app, state) = app();

        let (status, body) = send(
            &app,
            post_provision(json!({
                "provider": "aws",
                "template_key": "aws-standard",
                "network_overrides": {"provider": "azure"}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Incoherent provider between VM, Network and Storage");
        assert_eq!(logged(&state).await, 0);
    }

    #[tokio::test]
    async fn overrides_and_name_are_applied() {
        let (app, _) = app();

        let (status, body) = send(
            &app,
            post_provision(json!({
                "provider": "aws",
                "template_key": "aws-standard",
                "name": "api-01",
                "overrides": {"vcpus": 8, "name": "shadowed", "flavour": "large"},
                "storage_overrides": {"size_gb": 500, "iops": null}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["vm"]["name"], "api-01");
        assert_eq!(body["vm"]["vcpus"], 8);
        assert!(body["vm"].get("flavour").is_none());
        assert_eq!(body["storage"]["size_gb"], 500);
        assert_eq!(body["storage"]["iops"], Value::Null);
    }

    #[tokio::test]
    async fn free_form_id_and_numeric_overrides_are_echoed() {
        let (app, state) = app();

        let (status, body) = send(
            &app,
            post_provision(json!({
                "provider": "aws",
                "template_key": "aws-standard",
                "overrides": {"id": "my-vm-1", "memory_gb": 4.5},
                "network_overrides": {"id": "edge-net"},
                "storage_overrides": {"iops": -1}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["vm"]["id"], "my-vm-1");
        assert_eq!(body["vm"]["memory_gb"], 4.5);
        assert_eq!(body["network"]["id"], "edge-net");
        assert_eq!(body["storage"]["iops"], -1);

        let (_, listed) = send(&app, get("/provisioned")).await;
        assert_eq!(listed["vms"][0]["id"], "my-vm-1");
        assert_eq!(logged(&state).await, 1);
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected_with_detail() {
        let (app, state) = app();

        let (status, body) = send(&app, post_provision(json!({"template_key": "aws-standard"}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("provider"), "{detail}");
        assert_eq!(logged(&state).await, 0);
    }

    #[tokio::test]
    async fn malformed_json_body_gets_detail() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/provision")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn provisioned_lists_entries_in_call_order() {
        let (app, _) = app();
        let mut vm_ids = Vec::new();

        for _ in 0..2 {
            let (status, body) = send(
                &app,
                post_provision(json!({"provider": "gcp", "template_key": "gcp-memopt"})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            vm_ids.push(body["vm"]["id"].clone());
        }

        let (status, body) = send(&app, get("/provisioned")).await;
        assert_eq!(status, StatusCode::OK);

        for kind in ["vms", "networks", "storages"] {
            let entries = body[kind].as_array().unwrap();
            assert_eq!(entries.len(), 2, "{kind}");
            let ids: HashSet<&str> = entries.iter().map(|e| e["id"].as_str().unwrap()).collect();
            assert_eq!(ids.len(), 2, "{kind}");
        }
        let listed: Vec<Value> = body["vms"].as_array().unwrap().iter().map(|vm| vm["id"].clone()).collect();
        assert_eq!(listed, vm_ids);
    }

    #[tokio::test]
    async fn templates_and_health_endpoints() {
        let (app, _) = app();

        let (status, body) = send(&app, get("/templates")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vms"], json!(["aws-standard", "gcp-memopt"]));
        assert_eq!(body["storages"], json!(["aws-standard-store", "gcp-memopt-store"]));

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
