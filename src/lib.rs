//! # ActionKit Bridge - remote actions as MCP tools
//!
//! Exposes every action in an ActionKit project catalog as an individually
//! callable, schema-validated tool:
//! - RS256 bearer credentials for a fixed subject
//! - Catalog retrieval and action execution over HTTP
//! - Translation of each action's parameter spec into a validated tool schema
//! - An MCP (JSON-RPC 2.0) server on stdio
//!
//! ## Architecture
//!
//! ```text
//!   CredentialIssuer ──► ActionKitClient::fetch_catalog ──► Catalog
//!                                                             │
//!                                    SchemaTranslator ◄───────┤ per action
//!                                                             ▼
//!   stdio ◄──► StdioServer ──► ToolSet ──► ActionTool::call ──► ActionKitClient::execute
//! ```
//!
//! Construction is all-or-nothing by default: a fetch failure or an
//! untranslatable action leaves no tool set at all.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod actionkit;
pub mod mcp;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
