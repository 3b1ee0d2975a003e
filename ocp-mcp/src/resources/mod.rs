//! MCP Resource implementations
//!
//! Resources are read-only views of the cluster addressed by `cluster://`
//! URIs. Collection resources return object names; `services` groups names
//! by namespace and `info` reports API versions or a namespace's phase.

use ocp_core::{ObjectKind, ObjectStore};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{McpError, McpResult};
use crate::tools::cluster::{cluster_info, list_names, services_by_namespace};

/// URI scheme of every resource
pub const SCHEME: &str = "cluster://";

const JSON_MIME: &str = "application/json";

/// Namespaced collections: URI segment and the kind it lists
const NAMESPACED: [(&str, ObjectKind); 12] = [
    ("routes", ObjectKind::Route),
    ("pods", ObjectKind::Pod),
    ("deployments", ObjectKind::Deployment),
    ("configmaps", ObjectKind::ConfigMap),
    ("secrets", ObjectKind::Secret),
    ("jobs", ObjectKind::Job),
    ("pvcs", ObjectKind::PersistentVolumeClaim),
    ("ingresses", ObjectKind::Ingress),
    ("rolebindings", ObjectKind::RoleBinding),
    ("serviceaccounts", ObjectKind::ServiceAccount),
    ("resourcequotas", ObjectKind::ResourceQuota),
    ("events", ObjectKind::Event),
];

/// Resource definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Resource URI
    pub uri: String,

    /// Short name
    pub name: String,

    /// Description
    pub description: String,

    /// MIME type of the resource
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Resource template for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceTemplate {
    /// URI template with a `{namespace}` placeholder
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,

    pub name: String,

    pub description: String,

    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Fixed resources, readable without parameters
pub fn get_resource_definitions() -> Vec<ResourceDefinition> {
    [
        ("info", "API versions served by the cluster"),
        ("namespaces", "Names of all namespaces"),
        ("projects", "Names of all OpenShift projects"),
        ("services", "Service names of every namespace, grouped by namespace"),
    ]
    .into_iter()
    .map(|(name, description)| ResourceDefinition {
        uri: format!("{}{}", SCHEME, name),
        name: name.to_string(),
        description: description.to_string(),
        mime_type: JSON_MIME.to_string(),
    })
    .collect()
}

/// Per-namespace resources
pub fn get_resource_templates() -> Vec<ResourceTemplate> {
    let mut templates = vec![
        ResourceTemplate {
            uri_template: format!("{}services/{{namespace}}", SCHEME),
            name: "services".to_string(),
            description: "Service names in a namespace, keyed by the namespace".to_string(),
            mime_type: JSON_MIME.to_string(),
        },
        ResourceTemplate {
            uri_template: format!("{}info/{{namespace}}", SCHEME),
            name: "namespace-info".to_string(),
            description: "Lifecycle phase of a namespace".to_string(),
            mime_type: JSON_MIME.to_string(),
        },
    ];

    templates.extend(NAMESPACED.iter().map(|(segment, kind)| ResourceTemplate {
        uri_template: format!("{}{}/{{namespace}}", SCHEME, segment),
        name: segment.to_string(),
        description: format!("Names of the {} in a namespace", kind.plural()),
        mime_type: JSON_MIME.to_string(),
    }));

    templates
}

/// A parsed `cluster://` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterResource {
    /// `services` or `services/{namespace}`
    Services(Option<String>),
    /// `info` or `info/{namespace}`
    Info(Option<String>),
    /// `namespaces` or `projects`
    ClusterScoped(ObjectKind),
    /// `<collection>/{namespace}`
    Namespaced { kind: ObjectKind, namespace: String },
}

impl ClusterResource {
    /// Parse a URI; `None` when it names no known resource
    pub fn parse(uri: &str) -> Option<Self> {
        let path = uri.strip_prefix(SCHEME)?;
        let (segment, namespace) = match path.split_once('/') {
            Some((segment, ns)) if !ns.is_empty() && !ns.contains('/') => (segment, Some(ns)),
            Some(_) => return None,
            None => (path, None),
        };

        match (segment, namespace) {
            ("services", ns) => Some(Self::Services(ns.map(str::to_string))),
            ("info", ns) => Some(Self::Info(ns.map(str::to_string))),
            ("namespaces", None) => Some(Self::ClusterScoped(ObjectKind::Namespace)),
            ("projects", None) => Some(Self::ClusterScoped(ObjectKind::Project)),
            (segment, Some(ns)) => NAMESPACED
                .iter()
                .find(|(s, _)| *s == segment)
                .map(|(_, kind)| Self::Namespaced {
                    kind: *kind,
                    namespace: ns.to_string(),
                }),
            _ => None,
        }
    }

    /// Read the resource. Store failures become `{error, details}` values.
    pub async fn read(&self, store: &dyn ObjectStore) -> Value {
        let result = match self {
            Self::Services(ns) => services_by_namespace(store, ns.as_deref()).await,
            Self::Info(ns) => cluster_info(store, ns.as_deref()).await,
            Self::ClusterScoped(kind) => list_names(store, *kind, None).await.map(|names| json!(names)),
            Self::Namespaced { kind, namespace } => list_names(store, *kind, Some(namespace.as_str()))
                .await
                .map(|names| json!(names)),
        };

        result.unwrap_or_else(|failure| failure.to_value())
    }
}

/// Handle `resources/read` for `uri`
pub async fn read_resource(store: &dyn ObjectStore, uri: &str) -> McpResult<Value> {
    let resource =
        ClusterResource::parse(uri).ok_or_else(|| McpError::ResourceNotFound(uri.to_string()))?;
    let content = resource.read(store).await;

    Ok(json!({
        "contents": [{
            "uri": uri,
            "mimeType": JSON_MIME,
            "text": serde_json::to_string_pretty(&content)?
        }]
    }))
}
