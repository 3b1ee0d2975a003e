//! Deployment tools: gated creation and manifest validation

use ocp_core::gate;
use ocp_core::Manifest;
use serde_json::{json, Value};

use super::{ToolContext, ToolDefinition, ToolResult};
use crate::error::{McpError, McpResult};

/// create_deployment tool definition
pub fn create_deployment_tool() -> ToolDefinition {
    ToolDefinition {
        name: "create_deployment".to_string(),
        description: "Create a Deployment from a manifest. The manifest is checked against the security policy first (no hostNetwork, hostPID, hostIPC, privileged containers or hostPath volumes); a manifest that fails is never submitted.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["namespace", "deployment_manifest"],
            "properties": {
                "namespace": {
                    "type": "string",
                    "description": "Namespace to create the deployment in"
                },
                "deployment_manifest": {
                    "type": ["object", "string"],
                    "description": "Deployment manifest as an object, or as YAML/JSON text"
                }
            }
        }),
    }
}

/// validate_openshift_manifest tool definition
pub fn validate_manifest_tool() -> ToolDefinition {
    ToolDefinition {
        name: "validate_openshift_manifest".to_string(),
        description: "Check a Deployment manifest against OpenShift conventions. Returns structural errors and advisory warnings; nothing is submitted.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["manifest"],
            "properties": {
                "manifest": {
                    "type": ["object", "string"],
                    "description": "Deployment manifest as an object, or as YAML/JSON text"
                }
            }
        }),
    }
}

/// Turn a manifest argument into a [`Manifest`]
///
/// Objects are taken as-is. Strings are parsed as YAML, which also accepts JSON.
pub fn manifest_argument(value: &Value) -> McpResult<Manifest> {
    match value {
        Value::Object(_) => Ok(Manifest::new(value.clone())),
        Value::String(text) => Manifest::from_yaml_str(text)
            .map_err(|e| McpError::InvalidParams(format!("manifest could not be parsed: {}", e))),
        _ => Err(McpError::InvalidParams(
            "manifest must be an object or YAML/JSON text".to_string(),
        )),
    }
}

/// Security-check then create
pub async fn create_deployment(
    ctx: &ToolContext<'_>,
    namespace: &str,
    manifest: &Manifest,
) -> McpResult<ToolResult> {
    match gate::create_deployment(ctx.store, ctx.checker, namespace, manifest).await {
        Ok(created) => ToolResult::json(&created),
        Err(failure) => ToolResult::failure(&failure),
    }
}

/// Compliance errors and warnings, never a failure
pub fn validate_openshift_manifest(ctx: &ToolContext<'_>, manifest: &Manifest) -> McpResult<ToolResult> {
    ToolResult::json(&ctx.validator.validate(manifest))
}
