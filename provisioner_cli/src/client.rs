//! HTTP client for the provisioner API.

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use provisioner_core::{ProvisionRequest, ProvisionResponse, ProvisionedSnapshot, TemplateKeys};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {detail}")]
    Api { status: StatusCode, detail: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn provision(&self, request: &ProvisionRequest) -> Result<ProvisionResponse, CliError> {
        let response = self.http.post(self.url("/provision")).json(request).send().await?;
        decode(response).await
    }

    pub async fn list_provisioned(&self) -> Result<ProvisionedSnapshot, CliError> {
        let response = self.http.get(self.url("/provisioned")).send().await?;
        decode(response).await
    }

    pub async fn list_templates(&self) -> Result<TemplateKeys, CliError> {
        let response = self.http.get(self.url("/templates")).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => text,
    };
    Err(CliError::Api { status, detail })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn provisioned_body() -> serde_json::Value {
        json!({
            "status": "provisioned",
            "vm": {
                "id": "2d3b7e9a-6b5f-4f43-9f1f-7f0c2f3f8a11",
                "provider": "aws",
                "name": "aws-standard",
                "vcpus": 2,
                "memory_gb": 4,
                "disk_gb": 50,
                "network_id": null,
                "storage_id": null
            },
            "network": {
                "id": "6e8d0a3c-1b2a-4c7e-8a55-0d1e2f3a4b5c",
                "provider": "aws",
                "region": "us-east-1",
                "public_ip": true,
                "firewall_rules": ["SSH", "HTTP"]
            },
            "storage": {
                "id": "9a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d",
                "provider": "aws",
                "size_gb": 50,
                "iops": 100,
                "encrypted": true
            }
        })
    }

    #[tokio::test]
    async fn test_provision_decodes_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provision"))
            .and(body_partial_json(json!({"template_key": "aws-standard"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(provisioned_body()))
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/", server.uri()));
        let response = client
            .provision(&ProvisionRequest::new("aws", "aws-standard"))
            .await
            .unwrap();

        assert_eq!(response.status, "provisioned");
        assert_eq!(response.network.firewall_rules, vec!["SSH", "HTTP"]);
        assert_eq!(response.storage.iops, Some(serde_json::Number::from(100)));
        assert_eq!(response.vm.id, "2d3b7e9a-6b5f-4f43-9f1f-7f0c2f3f8a11");
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provision"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "VM template nope not found"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri());
        let err = client
            .provision(&ProvisionRequest::new("aws", "nope"))
            .await
            .unwrap_err();

        match err {
            CliError::Api { status, detail } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(detail, "VM template nope not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_list_templates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/templates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "vms": ["aws-standard"],
                "networks": ["aws-standard-net"],
                "storages": []
            })))
            .mount(&server)
            .await;

        let keys = ApiClient::new(&server.uri()).list_templates().await.unwrap();

        assert_eq!(keys.vms, vec!["aws-standard"]);
        assert!(keys.storages.is_empty());
    }
}
