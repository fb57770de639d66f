//! ActionKit boundary — credentials, the catalog model, and the HTTP client.
//!
//! The bridge only talks to the remote service through the two traits below,
//! so tests and alternative transports can stand in for [`ActionKitClient`].

pub mod catalog;
pub mod client;
pub mod credential;

pub use catalog::{ActionDescriptor, Catalog, CatalogResponse, Integration, ParameterSpec, PropertySpec};
pub use client::ActionKitClient;
pub use credential::{Claims, Credential, CredentialIssuer, CredentialSource, DEFAULT_VALIDITY};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::types::{ActionName, Result};

/// Retrieves the action catalog. All-or-nothing: any failure is `Error::Fetch`.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self, credential: &Credential) -> Result<Catalog>;
}

/// Executes one action remotely and returns the response body verbatim.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(
        &self,
        action: &ActionName,
        parameters: &Map<String, Value>,
        credential: &Credential,
    ) -> Result<Value>;
}
