//! MCP Tool implementations
//!
//! These are the tools exposed to agents through the MCP protocol.

pub mod cluster;
pub mod deployment;

use ocp_core::{ComplianceValidator, ErrorResponse, ObjectStore, SecurityChecker};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{McpError, McpResult};

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Description shown to the agent
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// A `tools/call` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// One content block of a tool result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Result of a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    /// Plain text result
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    /// JSON result, pretty printed into a text block
    pub fn json<T: Serialize>(value: &T) -> McpResult<Self> {
        Ok(Self::text(serde_json::to_string_pretty(value)?))
    }

    /// Failure result carrying an `{error, details}` value
    pub fn failure(response: &ErrorResponse) -> McpResult<Self> {
        let mut result = Self::json(response)?;
        result.is_error = true;
        Ok(result)
    }

    /// Text of the first content block
    pub fn first_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// What a tool call needs from the server
pub struct ToolContext<'a> {
    pub store: &'a dyn ObjectStore,
    pub checker: &'a SecurityChecker,
    pub validator: &'a ComplianceValidator,
}

/// Get all tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        cluster::list_namespaces_tool(),
        cluster::list_pods_tool(),
        cluster::get_pod_logs_tool(),
        cluster::list_deployments_tool(),
        cluster::list_routes_tool(),
        cluster::get_route_tool(),
        cluster::list_services_tool(),
        cluster::get_service_tool(),
        deployment::create_deployment_tool(),
        deployment::validate_manifest_tool(),
    ]
}

/// Dispatch a tool call by name
pub async fn call_tool(ctx: &ToolContext<'_>, call: &ToolCall) -> McpResult<ToolResult> {
    let args = Arguments::new(&call.arguments)?;
    tracing::debug!(tool = %call.name, "tool call");

    match call.name.as_str() {
        "list_namespaces" => cluster::list_namespaces(ctx).await,
        "list_pods" => cluster::list_pods(ctx, args.required("namespace")?).await,
        "get_pod_logs" => {
            cluster::get_pod_logs(
                ctx,
                args.required("namespace")?,
                args.required("pod_name")?,
                args.optional("container")?,
            )
            .await
        }
        "list_deployments" => cluster::list_deployments(ctx, args.required("namespace")?).await,
        "list_routes" => cluster::list_routes(ctx, args.required("namespace")?).await,
        "get_route" => {
            cluster::get_route(ctx, args.required("namespace")?, args.required("route_name")?)
                .await
        }
        "list_services" => cluster::list_services(ctx, args.required("namespace")?).await,
        "get_service" => {
            cluster::get_service(ctx, args.required("namespace")?, args.required("service_name")?)
                .await
        }
        "create_deployment" => {
            let manifest = deployment::manifest_argument(args.value("deployment_manifest")?)?;
            deployment::create_deployment(ctx, args.required("namespace")?, &manifest).await
        }
        "validate_openshift_manifest" => {
            let manifest = deployment::manifest_argument(args.value("manifest")?)?;
            deployment::validate_openshift_manifest(ctx, &manifest)
        }
        other => Err(McpError::ToolNotFound(other.to_string())),
    }
}

/// Named tool arguments
pub(crate) struct Arguments<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(arguments: &'a Value) -> McpResult<Self> {
        match arguments {
            Value::Null => Ok(Self { map: None }),
            Value::Object(map) => Ok(Self { map: Some(map) }),
            _ => Err(McpError::InvalidParams(
                "arguments must be an object".to_string(),
            )),
        }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(name)).filter(|v| !v.is_null())
    }

    /// A value that must be present
    pub(crate) fn value(&self, name: &str) -> McpResult<&'a Value> {
        self.get(name)
            .ok_or_else(|| McpError::InvalidParams(format!("missing argument '{}'", name)))
    }

    /// A string that must be present
    pub(crate) fn required(&self, name: &str) -> McpResult<&'a str> {
        self.optional(name)?
            .ok_or_else(|| McpError::InvalidParams(format!("missing argument '{}'", name)))
    }

    /// A string that may be absent
    pub(crate) fn optional(&self, name: &str) -> McpResult<Option<&'a str>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(McpError::InvalidParams(format!(
                "argument '{}' must be a string",
                name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definitions_unique_and_object_schemas() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 10);

        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);

        for tool in &tools {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
    }

    #[test]
    fn test_failure_result_is_error() {
        let result =
            ToolResult::failure(&ErrorResponse::new("Failed to get pod logs").with_details("boom"))
                .unwrap();
        assert!(result.is_error);
        let value: Value = serde_json::from_str(result.first_text()).unwrap();
        assert_eq!(value, json!({"error": "Failed to get pod logs", "details": "boom"}));
    }

    #[test]
    fn test_arguments() {
        let raw = json!({"namespace": "demo", "container": null, "count": 3});
        let args = Arguments::new(&raw).unwrap();

        assert_eq!(args.required("namespace").unwrap(), "demo");
        assert_eq!(args.optional("container").unwrap(), None);
        assert!(matches!(args.required("pod_name"), Err(McpError::InvalidParams(_))));
        assert!(matches!(args.optional("count"), Err(McpError::InvalidParams(_))));
        assert!(Arguments::new(&json!([1, 2])).is_err());
    }
}
