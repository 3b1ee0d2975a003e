//! MCP Server protocol implementation
//!
//! This module handles the MCP JSON-RPC protocol over stdio: one request per
//! line in, one response per line out. Notifications get no response.

use std::sync::Arc;

use ocp_core::{ComplianceValidator, ObjectStore, SecurityChecker};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::config::ServerConfig;
use crate::error::{McpError, McpResult, INTERNAL_ERROR, PARSE_ERROR};
use crate::tools::{ToolCall, ToolContext};
use crate::{prompts, resources, tools, PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};

/// MCP JSON-RPC request
#[derive(Debug, Clone, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub jsonrpc: String,
    /// `None` only when the `id` key is absent; `"id": null` is `Some(Null)`
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl McpRequest {
    /// Requests without an id are notifications
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// MCP JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl McpResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl From<&McpError> for RpcError {
    fn from(err: &McpError) -> Self {
        Self {
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

/// The OpenShift MCP server
pub struct OcpMcpServer {
    store: Arc<dyn ObjectStore>,
    checker: SecurityChecker,
    validator: ComplianceValidator,
    config: ServerConfig,
}

impl OcpMcpServer {
    /// Create a server over `store`
    pub fn new(store: Arc<dyn ObjectStore>, config: ServerConfig) -> Self {
        Self {
            store,
            checker: SecurityChecker::new(),
            validator: ComplianceValidator::new(),
            config,
        }
    }

    /// Replace the security checker (e.g. to inject a logger)
    pub fn with_checker(mut self, checker: SecurityChecker) -> Self {
        self.checker = checker;
        self
    }

    fn tool_context(&self) -> ToolContext<'_> {
        ToolContext {
            store: self.store.as_ref(),
            checker: &self.checker,
            validator: &self.validator,
        }
    }

    /// Run the MCP server over stdio until stdin closes
    pub async fn run_stdio(&self) -> McpResult<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        tracing::info!(backend = self.store.name(), "MCP server ready, listening on stdio");

        while let Some(line) = lines.next_line().await? {
            if let Some(reply) = self.handle_line(&line).await {
                stdout.write_all(reply.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw line; `None` when nothing should be written back
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Ok(raw) => {
                let id = raw.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<McpRequest>(raw) {
                    Ok(request) => self.handle_request(request).await?,
                    Err(e) => {
                        tracing::warn!("Invalid request: {}", e);
                        McpResponse::failure(id, RpcError::from(&McpError::InvalidRequest(e.to_string())))
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Unparsable request: {}", e);
                McpResponse::failure(
                    Value::Null,
                    RpcError {
                        code: PARSE_ERROR,
                        message: format!("Parse error: {}", e),
                    },
                )
            }
        };

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => Some(
                json!({
                    "jsonrpc": "2.0",
                    "id": response.id,
                    "error": {"code": INTERNAL_ERROR, "message": e.to_string()}
                })
                .to_string(),
            ),
        }
    }

    /// Handle an MCP request; notifications produce `None`
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let notification = request.is_notification();
        let result = if request.jsonrpc == "2.0" {
            self.dispatch(&request.method, request.params).await
        } else {
            Err(McpError::InvalidRequest(format!(
                "unsupported jsonrpc version '{}'",
                request.jsonrpc
            )))
        };

        if notification {
            if let Err(e) = result {
                tracing::debug!(method = %request.method, "notification ignored: {}", e);
            }
            return None;
        }

        let id = request.id.unwrap_or(Value::Null);
        Some(match result {
            Ok(value) => McpResponse::success(id, value),
            Err(e) => {
                tracing::warn!(method = %request.method, "request failed: {}", e);
                McpResponse::failure(id, RpcError::from(&e))
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> McpResult<Value> {
        match method {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "notifications/initialized" | "notifications/cancelled" => Ok(Value::Null),
            "tools/list" => Ok(json!({ "tools": tools::get_tool_definitions() })),
            "tools/call" => self.handle_tools_call(params).await,
            "resources/list" => Ok(json!({ "resources": resources::get_resource_definitions() })),
            "resources/templates/list" => {
                Ok(json!({ "resourceTemplates": resources::get_resource_templates() }))
            }
            "resources/read" => {
                let uri = required_param(&params, "uri")?;
                resources::read_resource(self.store.as_ref(), uri).await
            }
            "prompts/list" => Ok(json!({ "prompts": prompts::get_prompt_definitions() })),
            "prompts/get" => {
                let name = required_param(&params, "name")?;
                let arguments = params.get("arguments").unwrap_or(&Value::Null);
                prompts::get_prompt(
                    &self.tool_context(),
                    name,
                    arguments,
                    &self.config.default_namespace,
                )
                .await
            }
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            },
            "capabilities": {
                "tools": {},
                "resources": {},
                "prompts": {}
            },
            "instructions": "Inspect an OpenShift cluster through the list_* and get_* tools or cluster:// resources. \
create_deployment rejects manifests that use hostNetwork, hostPID, hostIPC, privileged containers or hostPath volumes; \
run validate_openshift_manifest first to see structural errors and recommendations."
        })
    }

    async fn handle_tools_call(&self, params: Value) -> McpResult<Value> {
        let call: ToolCall = serde_json::from_value(params)
            .map_err(|e| McpError::InvalidParams(format!("tools/call: {}", e)))?;

        let result = tools::call_tool(&self.tool_context(), &call).await?;
        if result.is_error {
            tracing::warn!(tool = %call.name, "tool returned an error");
        }
        Ok(serde_json::to_value(result)?)
    }
}

fn required_param<'a>(params: &'a Value, name: &str) -> McpResult<&'a str> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| McpError::InvalidParams(format!("missing '{}' parameter", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocp_core::InMemoryObjectStore;

    fn server() -> OcpMcpServer {
        let config = ServerConfig::default();
        let store = config.open_store().unwrap();
        OcpMcpServer::new(Arc::new(store), config)
    }

    #[tokio::test]
    async fn test_initialize() {
        let reply = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(value["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn test_notification_has_no_reply() {
        let server = server();
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"no/such/method"}"#)
            .await
            .is_none());
        assert!(server.handle_line("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let reply = server().handle_line("{not json").await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], PARSE_ERROR);
        assert!(value["id"].is_null());
    }

    #[tokio::test]
    async fn test_null_id_is_a_request() {
        let reply = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert!(value["id"].is_null());
        assert_eq!(value["result"], json!({}));
    }

    #[test]
    fn test_id_presence() {
        let absent: McpRequest = serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();
        assert!(absent.is_notification());

        let null: McpRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert_eq!(null.id, Some(Value::Null));
        assert!(!null.is_notification());
    }

    #[tokio::test]
    async fn test_non_request_object_is_invalid_request() {
        let reply = server().handle_line(r#"{"jsonrpc":"2.0","id":5}"#).await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], -32600);
        assert_eq!(value["id"], 5);

        let reply = server().handle_line("[1, 2]").await.unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], -32600);
        assert!(value["id"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server()
            .handle_request(McpRequest {
                jsonrpc: "2.0".to_string(),
                id: Some(json!("a")),
                method: "sampling/createMessage".to_string(),
                params: Value::Null,
            })
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_wrong_version_rejected() {
        let reply = server()
            .handle_line(r#"{"jsonrpc":"1.0","id":3,"method":"ping"}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["error"]["code"], -32600);
        assert_eq!(value["id"], 3);
    }

    #[tokio::test]
    async fn test_resources_read_requires_uri() {
        let server = OcpMcpServer::new(Arc::new(InMemoryObjectStore::new()), ServerConfig::default());
        let response = server
            .handle_request(McpRequest {
                jsonrpc: "2.0".to_string(),
                id: Some(json!(7)),
                method: "resources/read".to_string(),
                params: json!({}),
            })
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }
}
