//! Method router — JSON-RPC envelopes and the MCP methods this server answers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::tools::ToolSet;
use crate::types::{Error, Result, ServerConfig};

/// Protocol revision reported when the client does not ask for one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Incoming JSON-RPC message. Requests carry an `id`; notifications do not.
///
/// An explicit `"id": null` is still a request and gets a reply.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

fn present_id<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

pub fn success(id: Value, result: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        },
    })
}

/// Route one request to its handler and build the JSON-RPC response.
pub async fn route_request(tools: &ToolSet, server: &ServerConfig, request: RpcRequest) -> Value {
    let id = request.id.clone().unwrap_or(Value::Null);
    match handle(tools, server, &request.method, &request.params).await {
        Ok(result) => success(id, result),
        Err(e) => failure(id, e.to_rpc_code(), e.to_string()),
    }
}

async fn handle(tools: &ToolSet, server: &ServerConfig, method: &str, params: &Value) -> Result<Value> {
    match method {
        "initialize" => {
            let version = params
                .get("protocolVersion")
                .and_then(|v| v.as_str())
                .unwrap_or(PROTOCOL_VERSION);

            Ok(serde_json::json!({
                "protocolVersion": version,
                "capabilities": {
                    "tools": { "listChanged": false },
                },
                "serverInfo": {
                    "name": server.name,
                    "version": server.version,
                },
            }))
        }

        "ping" => Ok(serde_json::json!({})),

        "tools/list" => {
            let listing: Vec<Value> = tools.tools().iter().map(|t| t.to_listing()).collect();
            Ok(serde_json::json!({ "tools": listing }))
        }

        "tools/call" => {
            let name = str_field(params, "name")?;
            if !tools.contains(&name) {
                return Err(Error::validation(format!("Unknown tool: {}", name)));
            }
            let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

            match tools.call(&name, &arguments).await {
                Ok(result) => Ok(tool_result(&result, false)),
                Err(e) => Ok(tool_result(&Value::from(e.to_string()), true)),
            }
        }

        _ => Err(Error::not_found(format!("Unknown method: {}", method))),
    }
}

/// Wrap a tool outcome as MCP call content. Strings are passed as-is, other
/// values as their compact JSON text.
fn tool_result(payload: &Value, is_error: bool) -> Value {
    let text = match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    serde_json::json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    })
}

pub fn str_field(body: &Value, key: &str) -> Result<String> {
    body.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::validation(format!("Missing required field: {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RPC_INVALID_PARAMS, RPC_METHOD_NOT_FOUND};
    use serde_json::json;

    fn request(id: i64, method: &str, params: Value) -> RpcRequest {
        RpcRequest {
            id: Some(json!(id)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let response = route_request(
            &ToolSet::new(),
            &ServerConfig::default(),
            request(1, "initialize", json!({"protocolVersion": "2025-03-26"})),
        )
        .await;

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(response["result"]["serverInfo"]["name"], "actionkit-mcp");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = route_request(
            &ToolSet::new(),
            &ServerConfig::default(),
            request(2, "resources/list", Value::Null),
        )
        .await;
        assert_eq!(response["error"]["code"], RPC_METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_call_unknown_tool_is_invalid_params() {
        let response = route_request(
            &ToolSet::new(),
            &ServerConfig::default(),
            request(3, "tools/call", json!({"name": "nope"})),
        )
        .await;
        assert_eq!(response["error"]["code"], RPC_INVALID_PARAMS);
        assert_eq!(response["error"]["message"], "validation error: Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_call_without_name() {
        let response = route_request(
            &ToolSet::new(),
            &ServerConfig::default(),
            request(4, "tools/call", json!({})),
        )
        .await;
        assert_eq!(response["error"]["code"], RPC_INVALID_PARAMS);
    }

    #[test]
    fn test_null_id_is_a_request() {
        let request: RpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": null, "method": "ping"})).unwrap();
        assert_eq!(request.id, Some(Value::Null));
        assert!(!request.is_notification());

        let notification: RpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
                .unwrap();
        assert!(notification.is_notification());
    }

    #[test]
    fn test_tool_result_shapes() {
        let ok = tool_result(&json!({"ok": true}), false);
        assert_eq!(ok["content"][0]["text"], "{\"ok\":true}");
        assert_eq!(ok["isError"], false);

        let err = tool_result(&json!("boom"), true);
        assert_eq!(err["content"][0]["text"], "boom");
        assert_eq!(err["isError"], true);
    }
}
