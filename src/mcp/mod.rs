//! MCP stdio transport layer.
//!
//! Newline-delimited JSON-RPC 2.0 on stdin/stdout, answering the subset of
//! MCP needed to list and call tools.

pub mod codec;
pub mod router;
pub mod server;

pub use server::StdioServer;
