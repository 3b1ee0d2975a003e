//! Prompt handlers
//!
//! Prompts give natural-language shortcuts onto the tools. Each takes a
//! free-form `input` string plus optional named arguments, resolves them to
//! one tool call, and returns the tool's output as a single user message.
//!
//! Listing prompts take the namespace from `namespace`, then `input`, then
//! the configured default. Single-object prompts take the namespace from
//! `namespace` or the default, and the object name from its named argument
//! or `input`. Empty strings count as absent.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{McpError, McpResult};
use crate::tools::{call_tool, ToolCall, ToolContext};

/// Prompt argument for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Prompt definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

fn argument(name: &str, description: &str) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: description.to_string(),
        required: false,
    }
}

fn prompt(name: &str, description: &str, input: &str, extra: &[(&str, &str)]) -> PromptDefinition {
    let mut arguments = vec![argument("input", input)];
    arguments.extend(extra.iter().map(|(n, d)| argument(n, d)));
    PromptDefinition {
        name: name.to_string(),
        description: description.to_string(),
        arguments,
    }
}

const NAMESPACE_ARG: (&str, &str) = ("namespace", "Namespace to use");

/// Get all prompt definitions
pub fn get_prompt_definitions() -> Vec<PromptDefinition> {
    vec![
        prompt("prompt_list_namespaces", "List all namespaces.", "Not used", &[]),
        prompt("prompt_list_pods", "List all pods in a namespace.", "Namespace name", &[NAMESPACE_ARG]),
        prompt(
            "prompt_get_pod_logs",
            "Get logs for a pod, optionally for one container.",
            "Pod name",
            &[NAMESPACE_ARG, ("pod_name", "Pod to read"), ("container", "Container within the pod")],
        ),
        prompt(
            "prompt_list_deployments",
            "List all deployments in a namespace.",
            "Namespace name",
            &[NAMESPACE_ARG],
        ),
        prompt("prompt_list_services", "List all services in a namespace.", "Namespace name", &[NAMESPACE_ARG]),
        prompt(
            "prompt_get_service",
            "Get details for a service.",
            "Service name",
            &[NAMESPACE_ARG, ("service_name", "Service to read")],
        ),
        prompt("prompt_list_routes", "List all routes in a namespace.", "Namespace name", &[NAMESPACE_ARG]),
        prompt(
            "prompt_get_route",
            "Get details for a route.",
            "Route name",
            &[NAMESPACE_ARG, ("route_name", "Route to read")],
        ),
        prompt(
            "prompt_create_deployment",
            "Create a deployment from a manifest, after the security check.",
            "Deployment manifest (YAML or JSON)",
            &[NAMESPACE_ARG, ("deployment_manifest", "Deployment manifest (YAML or JSON)")],
        ),
        prompt(
            "prompt_validate_manifest",
            "Validate an OpenShift deployment manifest.",
            "Deployment manifest (YAML or JSON)",
            &[],
        ),
    ]
}

/// Map a prompt and its arguments to the tool call it stands for
pub fn resolve_prompt(name: &str, arguments: &Value, default_namespace: &str) -> McpResult<ToolCall> {
    let args = PromptArgs::new(arguments)?;

    let listing = |tool: &str| ToolCall {
        name: tool.to_string(),
        arguments: json!({
            "namespace": args.first(&["namespace", "input"]).unwrap_or(default_namespace)
        }),
    };
    let namespace = args.first(&["namespace"]).unwrap_or(default_namespace);
    let object_name = |arg: &str| {
        args.first(&[arg, "input"])
            .ok_or_else(|| McpError::InvalidParams(format!("'{}' or 'input' is required", arg)))
    };

    let call = match name {
        "prompt_list_namespaces" => ToolCall {
            name: "list_namespaces".to_string(),
            arguments: json!({}),
        },
        "prompt_list_pods" => listing("list_pods"),
        "prompt_list_deployments" => listing("list_deployments"),
        "prompt_list_services" => listing("list_services"),
        "prompt_list_routes" => listing("list_routes"),
        "prompt_get_pod_logs" => {
            let mut arguments = json!({
                "namespace": namespace,
                "pod_name": object_name("pod_name")?
            });
            if let Some(container) = args.first(&["container"]) {
                arguments["container"] = json!(container);
            }
            ToolCall {
                name: "get_pod_logs".to_string(),
                arguments,
            }
        }
        "prompt_get_service" => ToolCall {
            name: "get_service".to_string(),
            arguments: json!({
                "namespace": namespace,
                "service_name": object_name("service_name")?
            }),
        },
        "prompt_get_route" => ToolCall {
            name: "get_route".to_string(),
            arguments: json!({
                "namespace": namespace,
                "route_name": object_name("route_name")?
            }),
        },
        "prompt_create_deployment" => {
            let manifest = args
                .raw("deployment_manifest")
                .cloned()
                .or_else(|| args.first(&["input"]).map(|s| json!(s)))
                .ok_or_else(|| {
                    McpError::InvalidParams("'deployment_manifest' or 'input' is required".to_string())
                })?;
            ToolCall {
                name: "create_deployment".to_string(),
                arguments: json!({ "namespace": namespace, "deployment_manifest": manifest }),
            }
        }
        "prompt_validate_manifest" => {
            let manifest = args
                .first(&["input"])
                .ok_or_else(|| McpError::InvalidParams("'input' is required".to_string()))?;
            ToolCall {
                name: "validate_openshift_manifest".to_string(),
                arguments: json!({ "manifest": manifest }),
            }
        }
        other => return Err(McpError::PromptNotFound(other.to_string())),
    };

    Ok(call)
}

/// Handle `prompts/get`: run the resolved tool and wrap its output
pub async fn get_prompt(
    ctx: &ToolContext<'_>,
    name: &str,
    arguments: &Value,
    default_namespace: &str,
) -> McpResult<Value> {
    let call = resolve_prompt(name, arguments, default_namespace)?;
    tracing::debug!(prompt = name, tool = %call.name, "prompt resolved");
    let result = call_tool(ctx, &call).await?;

    Ok(json!({
        "description": format!("Output of {}", call.name),
        "messages": [{
            "role": "user",
            "content": {
                "type": "text",
                "text": result.first_text()
            }
        }]
    }))
}

struct PromptArgs<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> PromptArgs<'a> {
    fn new(arguments: &'a Value) -> McpResult<Self> {
        match arguments {
            Value::Null => Ok(Self { map: None }),
            Value::Object(map) => Ok(Self { map: Some(map) }),
            _ => Err(McpError::InvalidParams(
                "prompt arguments must be an object".to_string(),
            )),
        }
    }

    fn raw(&self, name: &str) -> Option<&'a Value> {
        self.map
            .and_then(|m| m.get(name))
            .filter(|v| !matches!(v, Value::Null) && v.as_str() != Some(""))
    }

    /// First non-empty string among `names`
    fn first(&self, names: &[&str]) -> Option<&'a str> {
        names
            .iter()
            .filter_map(|n| self.raw(n).and_then(Value::as_str))
            .next()
    }
}
