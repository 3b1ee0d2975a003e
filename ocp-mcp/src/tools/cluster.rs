//! Read-only cluster tools
//!
//! Listing tools return object names. Single-object reads return the stored
//! object, or an `{error, details}` failure when the read fails.

use std::collections::BTreeMap;

use ocp_core::{ErrorResponse, ObjectKind, ObjectStore};
use serde_json::{json, Value};

use super::{ToolContext, ToolDefinition, ToolResult};
use crate::error::McpResult;

fn namespace_schema() -> Value {
    json!({
        "type": "string",
        "description": "Namespace (project) to query"
    })
}

fn namespaced_list_tool(name: &str, what: &str) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: format!("List the names of all {} in a namespace.", what),
        input_schema: json!({
            "type": "object",
            "required": ["namespace"],
            "properties": { "namespace": namespace_schema() }
        }),
    }
}

/// list_namespaces tool definition
pub fn list_namespaces_tool() -> ToolDefinition {
    ToolDefinition {
        name: "list_namespaces".to_string(),
        description: "List the names of all namespaces in the cluster.".to_string(),
        input_schema: json!({ "type": "object", "properties": {} }),
    }
}

/// list_pods tool definition
pub fn list_pods_tool() -> ToolDefinition {
    namespaced_list_tool("list_pods", "pods")
}

/// get_pod_logs tool definition
pub fn get_pod_logs_tool() -> ToolDefinition {
    ToolDefinition {
        name: "get_pod_logs".to_string(),
        description: "Read the log output of a pod. Pods with several containers need a container name.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["namespace", "pod_name"],
            "properties": {
                "namespace": namespace_schema(),
                "pod_name": { "type": "string", "description": "Pod to read logs from" },
                "container": { "type": "string", "description": "Optional: container within the pod" }
            }
        }),
    }
}

/// list_deployments tool definition
pub fn list_deployments_tool() -> ToolDefinition {
    namespaced_list_tool("list_deployments", "deployments")
}

/// list_routes tool definition
pub fn list_routes_tool() -> ToolDefinition {
    namespaced_list_tool("list_routes", "OpenShift routes")
}

/// get_route tool definition
pub fn get_route_tool() -> ToolDefinition {
    ToolDefinition {
        name: "get_route".to_string(),
        description: "Get the full definition of an OpenShift route.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["namespace", "route_name"],
            "properties": {
                "namespace": namespace_schema(),
                "route_name": { "type": "string", "description": "Route to read" }
            }
        }),
    }
}

/// list_services tool definition
pub fn list_services_tool() -> ToolDefinition {
    namespaced_list_tool("list_services", "services")
}

/// get_service tool definition
pub fn get_service_tool() -> ToolDefinition {
    ToolDefinition {
        name: "get_service".to_string(),
        description: "Get the full definition of a service.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["namespace", "service_name"],
            "properties": {
                "namespace": namespace_schema(),
                "service_name": { "type": "string", "description": "Service to read" }
            }
        }),
    }
}

/// Names of every object of `kind`, scoped to `namespace` when given
pub async fn list_names(
    store: &dyn ObjectStore,
    kind: ObjectKind,
    namespace: Option<&str>,
) -> Result<Vec<String>, ErrorResponse> {
    match store.list(kind, namespace).await {
        Ok(refs) => Ok(refs.into_iter().map(|r| r.name).collect()),
        Err(e) => {
            tracing::error!("Failed to list {}: {}", kind.plural(), e);
            Err(ErrorResponse::new(format!("Failed to list {}", kind.plural())).with_details(e.to_string()))
        }
    }
}

/// Service names keyed by namespace
///
/// With a namespace the result has exactly that key, even when it holds no
/// services. Without one, every namespace that has a service appears.
pub async fn services_by_namespace(
    store: &dyn ObjectStore,
    namespace: Option<&str>,
) -> Result<Value, ErrorResponse> {
    let refs = store
        .list(ObjectKind::Service, namespace)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get services: {}", e);
            ErrorResponse::new("Failed to get services").with_details(e.to_string())
        })?;

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if let Some(ns) = namespace {
        grouped.entry(ns.to_string()).or_default();
    }
    for r in refs {
        let ns = r.namespace.unwrap_or_default();
        grouped.entry(ns).or_default().push(r.name);
    }

    Ok(json!(grouped))
}

/// `{"namespace_status": phase}` for a namespace, `{"api_versions": [...]}` otherwise
pub async fn cluster_info(
    store: &dyn ObjectStore,
    namespace: Option<&str>,
) -> Result<Value, ErrorResponse> {
    let result = match namespace {
        Some(ns) => store
            .namespace_phase(ns)
            .await
            .map(|phase| json!({ "namespace_status": phase })),
        None => store
            .api_versions()
            .await
            .map(|versions| json!({ "api_versions": versions })),
    };

    result.map_err(|e| {
        tracing::error!("Failed to get cluster info: {}", e);
        ErrorResponse::new("Failed to get cluster info").with_details(e.to_string())
    })
}

async fn list_tool(
    ctx: &ToolContext<'_>,
    kind: ObjectKind,
    namespace: Option<&str>,
) -> McpResult<ToolResult> {
    match list_names(ctx.store, kind, namespace).await {
        Ok(names) => ToolResult::json(&names),
        Err(failure) => ToolResult::failure(&failure),
    }
}

/// Names of all namespaces
pub async fn list_namespaces(ctx: &ToolContext<'_>) -> McpResult<ToolResult> {
    list_tool(ctx, ObjectKind::Namespace, None).await
}

/// Names of the pods in `namespace`
pub async fn list_pods(ctx: &ToolContext<'_>, namespace: &str) -> McpResult<ToolResult> {
    list_tool(ctx, ObjectKind::Pod, Some(namespace)).await
}

/// Log text of a pod
pub async fn get_pod_logs(
    ctx: &ToolContext<'_>,
    namespace: &str,
    pod_name: &str,
    container: Option<&str>,
) -> McpResult<ToolResult> {
    match ctx.store.pod_logs(namespace, pod_name, container).await {
        Ok(text) => Ok(ToolResult::text(text)),
        Err(e) => {
            tracing::error!("Failed to get logs for pod {} in {}: {}", pod_name, namespace, e);
            ToolResult::failure(&ErrorResponse::new("Failed to get pod logs").with_details(e.to_string()))
        }
    }
}

/// Names of the deployments in `namespace`
pub async fn list_deployments(ctx: &ToolContext<'_>, namespace: &str) -> McpResult<ToolResult> {
    list_tool(ctx, ObjectKind::Deployment, Some(namespace)).await
}

/// Names of the routes in `namespace`
pub async fn list_routes(ctx: &ToolContext<'_>, namespace: &str) -> McpResult<ToolResult> {
    list_tool(ctx, ObjectKind::Route, Some(namespace)).await
}

/// Names of the services in `namespace`
pub async fn list_services(ctx: &ToolContext<'_>, namespace: &str) -> McpResult<ToolResult> {
    list_tool(ctx, ObjectKind::Service, Some(namespace)).await
}

async fn get_object(
    ctx: &ToolContext<'_>,
    kind: ObjectKind,
    namespace: &str,
    name: &str,
) -> McpResult<ToolResult> {
    match ctx.store.get(kind, namespace, name).await {
        Ok(object) => ToolResult::json(&object),
        Err(e) => {
            let what = kind.as_str().to_lowercase();
            tracing::error!("Failed to get {} {} in {}: {}", what, name, namespace, e);
            ToolResult::failure(
                &ErrorResponse::new(format!("Failed to get {} {}", what, name)).with_details(e.to_string()),
            )
        }
    }
}

/// Full route object
pub async fn get_route(ctx: &ToolContext<'_>, namespace: &str, route_name: &str) -> McpResult<ToolResult> {
    get_object(ctx, ObjectKind::Route, namespace, route_name).await
}

/// Full service object
pub async fn get_service(
    ctx: &ToolContext<'_>,
    namespace: &str,
    service_name: &str,
) -> McpResult<ToolResult> {
    get_object(ctx, ObjectKind::Service, namespace, service_name).await
}
