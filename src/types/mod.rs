//! Core types for the ActionKit bridge.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (ActionName, SubjectId, InvocationId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for the remote service, schema and server

mod config;
mod errors;
mod ids;

pub use config::{
    ActionKitConfig, BridgeConfig, BuildPolicy, Config, CredentialConfig, SchemaConfig,
    ServerConfig, StringLengthMode, DEFAULT_BASE_URL,
};
pub use errors::{
    Error, Result, RPC_INTERNAL_ERROR, RPC_INVALID_PARAMS, RPC_INVALID_REQUEST,
    RPC_METHOD_NOT_FOUND, RPC_PARSE_ERROR,
};
pub use ids::{ActionName, InvocationId, SubjectId};
