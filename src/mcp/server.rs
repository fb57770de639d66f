//! Stdio MCP server — read loop, per-call tasks and a single writer.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::mcp::codec::{read_line, write_message, Line};
use crate::mcp::router::{self, failure, RpcRequest};
use crate::tools::ToolSet;
use crate::types::{ServerConfig, RPC_INVALID_REQUEST, RPC_PARSE_ERROR};

/// Responses queued for the writer before readers wait.
const RESPONSE_CHANNEL_CAPACITY: usize = 64;

/// MCP server exposing a tool set over a line-delimited JSON-RPC stream.
#[derive(Debug)]
pub struct StdioServer {
    tools: Arc<ToolSet>,
    config: ServerConfig,
    cancel: CancellationToken,
}

impl StdioServer {
    pub fn new(tools: Arc<ToolSet>, config: ServerConfig) -> Self {
        Self {
            tools,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Serve on the process's stdin/stdout.
    pub async fn serve_stdio(&self) -> std::io::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve until EOF on `reader`, cancellation, or a write failure.
    ///
    /// `tools/call` requests run on their own tasks so a slow remote action
    /// does not hold up other requests; responses may therefore arrive out of
    /// order and are matched by id. In-flight calls are drained before return.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut reader = BufReader::new(reader);
        let (tx, rx) = mpsc::channel::<Value>(RESPONSE_CHANNEL_CAPACITY);
        let writer_task = tokio::spawn(write_responses(writer, rx));

        tracing::info!(tools = self.tools.len(), "MCP server listening on stdio");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("MCP server shutting down");
                    break;
                }
                line = read_line(&mut reader, self.config.max_line_bytes) => {
                    let bytes = match line? {
                        None => {
                            tracing::info!("stdin closed, shutting down");
                            break;
                        }
                        Some(Line::Oversized(len)) => {
                            tracing::warn!(len, max = self.config.max_line_bytes, "Rejected oversized message");
                            let response = failure(Value::Null, RPC_INVALID_REQUEST, format!("Message too large: {} bytes", len));
                            if tx.send(response).await.is_err() {
                                break;
                            }
                            continue;
                        }
                        Some(Line::Message(bytes)) if bytes.iter().all(u8::is_ascii_whitespace) => continue,
                        Some(Line::Message(bytes)) => bytes,
                    };

                    let Some(response) = self.dispatch(&bytes, &tx).await else {
                        continue;
                    };
                    if tx.send(response).await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(tx);
        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
        }
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Handle one message. Returns the response to send now, if any; tool
    /// calls answer later through `tx`.
    async fn dispatch(&self, bytes: &[u8], tx: &mpsc::Sender<Value>) -> Option<Value> {
        let message: Value = match serde_json::from_slice(bytes) {
            Ok(v) => v,
            Err(e) => return Some(failure(Value::Null, RPC_PARSE_ERROR, format!("Parse error: {}", e))),
        };
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: RpcRequest = match serde_json::from_value(message) {
            Ok(r) => r,
            Err(e) => return Some(failure(id, RPC_INVALID_REQUEST, format!("Invalid request: {}", e))),
        };

        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        tracing::debug!(method = %request.method, "Request received");

        if request.method == "tools/call" {
            let tools = Arc::clone(&self.tools);
            let config = self.config.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let response = router::route_request(&tools, &config, request).await;
                if tx.send(response).await.is_err() {
                    tracing::warn!("Response dropped: writer closed");
                }
            });
            return None;
        }

        Some(router::route_request(&self.tools, &self.config, request).await)
    }
}

async fn write_responses<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut rx: mpsc::Receiver<Value>,
) -> std::io::Result<()> {
    while let Some(response) = rx.recv().await {
        if let Err(e) = write_message(&mut writer, &response).await {
            tracing::error!("Failed to write response: {}", e);
            return Err(e);
        }
    }
    Ok(())
}
