//! Tool infrastructure — schema translation and the action bridge.
//!
//! The translator owns parameter typing and validation; the bridge turns a
//! whole catalog into callable tools that proxy to the remote service.

pub mod bridge;
pub mod schema;

pub use bridge::{ActionBridge, ActionTool, ToolSet};
pub use schema::{translate, LengthLimit, ParamDef, ParamKind, ParamType, SchemaTranslator, ToolSchema};
