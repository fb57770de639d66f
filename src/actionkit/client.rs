//! HTTP client for the ActionKit project endpoints.
//!
//! Both endpoints share one URL: `GET` lists the catalog, `POST` runs an
//! action. Every request carries the bearer credential and the configured
//! timeout; nothing is retried.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use super::catalog::{Catalog, CatalogResponse};
use super::credential::Credential;
use super::{ActionExecutor, CatalogSource};
use crate::types::{ActionKitConfig, ActionName, Error, Result};

/// Client for one ActionKit project.
#[derive(Debug, Clone)]
pub struct ActionKitClient {
    http: reqwest::Client,
    actions_url: String,
}

impl ActionKitClient {
    pub fn new(config: &ActionKitConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(Error::config("ActionKit project id is not set"));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        let actions_url = format!(
            "{}/projects/{}/actions",
            config.base_url.trim_end_matches('/'),
            config.project_id
        );

        Ok(Self { http, actions_url })
    }

    /// URL of the catalog and execution endpoint.
    pub fn actions_url(&self) -> &str {
        &self.actions_url
    }
}

#[async_trait]
impl CatalogSource for ActionKitClient {
    async fn fetch_catalog(&self, credential: &Credential) -> Result<Catalog> {
        tracing::debug!(url = %self.actions_url, "Fetching action catalog");

        let response = self
            .http
            .get(&self.actions_url)
            .bearer_auth(credential.token())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| Error::fetch(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(format!("HTTP error; status: {}", status)));
        }

        let envelope: CatalogResponse = response
            .json()
            .await
            .map_err(|e| Error::fetch(format!("malformed catalog body: {}", e)))?;

        tracing::info!(
            integrations = envelope.body.integrations().len(),
            actions = envelope.body.action_count(),
            "Fetched action catalog"
        );
        Ok(envelope.body)
    }
}

#[async_trait]
impl ActionExecutor for ActionKitClient {
    async fn execute(
        &self,
        action: &ActionName,
        parameters: &Map<String, Value>,
        credential: &Credential,
    ) -> Result<Value> {
        let transport = |message: String| Error::InvocationTransport {
            action: action.to_string(),
            message,
        };

        let body = serde_json::json!({
            "action": action.as_str(),
            "parameters": parameters,
        });

        let response = self
            .http
            .post(&self.actions_url)
            .bearer_auth(credential.token())
            .json(&body)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::InvocationRejected {
                action: action.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| transport(format!("undecodable response body: {}", e)))
    }
}
