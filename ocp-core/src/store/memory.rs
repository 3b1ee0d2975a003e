//! In-memory object store
//!
//! Objects live in a `BTreeMap` keyed by (kind, namespace, name), so listings
//! come back sorted. Thread-safe via `RwLock`; a poisoned lock surfaces as
//! [`OcpError::StoreLocked`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{OcpError, Result};
use crate::manifest::Node;

use super::{ObjectKind, ObjectRef, ObjectStore};

const DEFAULT_API_VERSIONS: [&str; 1] = ["v1"];

/// Captured log output of one pod (or one container in it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodLog {
    pub namespace: String,
    pub pod: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    pub text: String,
}

/// Serialized cluster content used to seed an [`InMemoryObjectStore`]
///
/// ```yaml
/// namespaces: [default, shop]
/// apiVersions: [v1, apps/v1]
/// objects:
///   - kind: Service
///     metadata: {name: web, namespace: shop}
/// logs:
///   - {namespace: shop, pod: web-1, text: "started\n"}
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSnapshot {
    /// Namespaces to create as `Active`
    #[serde(default)]
    pub namespaces: Vec<String>,

    /// Objects of any supported kind, each with `kind` and `metadata`
    #[serde(default)]
    pub objects: Vec<Value>,

    /// Pod logs
    #[serde(default)]
    pub logs: Vec<PodLog>,

    /// API group versions reported by `api_versions`
    #[serde(default)]
    pub api_versions: Vec<String>,
}

impl ClusterSnapshot {
    /// Load from a file. `.json` files are read as JSON, everything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| OcpError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&text)?),
            _ => Ok(serde_yaml::from_str(&text)?),
        }
    }
}

type ObjectKey = (ObjectKind, String, String);

/// In-memory object store (default backend)
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<ObjectKey, Value>>,
    logs: RwLock<Vec<PodLog>>,
    api_versions: Vec<String>,
}

impl InMemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the snapshot's content
    pub fn from_snapshot(snapshot: ClusterSnapshot) -> Result<Self> {
        let store = Self {
            api_versions: snapshot.api_versions,
            ..Self::default()
        };

        for namespace in &snapshot.namespaces {
            store.add_namespace(namespace)?;
        }
        for object in snapshot.objects {
            store.insert(object)?;
        }
        for log in snapshot.logs {
            store.add_log(log)?;
        }

        Ok(store)
    }

    /// Add an `Active` namespace; existing namespaces are left untouched
    pub fn add_namespace(&self, name: &str) -> Result<()> {
        let mut objects = self.objects.write().map_err(|_| OcpError::StoreLocked)?;
        objects
            .entry((ObjectKind::Namespace, String::new(), name.to_string()))
            .or_insert_with(|| {
                json!({
                    "apiVersion": "v1",
                    "kind": "Namespace",
                    "metadata": {"name": name},
                    "status": {"phase": "Active"}
                })
            });
        Ok(())
    }

    /// Store an object as-is, replacing any object with the same key
    pub fn insert(&self, object: Value) -> Result<()> {
        let key = object_key(&object)?;
        let mut objects = self.objects.write().map_err(|_| OcpError::StoreLocked)?;
        objects.insert(key, object);
        Ok(())
    }

    /// Record pod log output
    pub fn add_log(&self, log: PodLog) -> Result<()> {
        let mut logs = self.logs.write().map_err(|_| OcpError::StoreLocked)?;
        logs.push(log);
        Ok(())
    }

    /// Total number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn require_namespace(objects: &BTreeMap<ObjectKey, Value>, namespace: &str) -> Result<()> {
        let key = (ObjectKind::Namespace, String::new(), namespace.to_string());
        if objects.contains_key(&key) {
            Ok(())
        } else {
            Err(OcpError::NamespaceNotFound {
                namespace: namespace.to_string(),
            })
        }
    }

    /// Build the stored form of a create request
    fn prepare(kind: ObjectKind, namespace: &str, manifest: &Value) -> Result<(String, Value)> {
        let root = Node::new(manifest);
        let invalid = |reason: String| OcpError::InvalidObject {
            kind: kind.to_string(),
            reason,
        };

        if !manifest.is_object() {
            return Err(invalid("manifest must be a mapping".to_string()));
        }
        if let Some(declared) = root.get("kind").as_str() {
            if declared != kind.as_str() {
                return Err(invalid(format!("kind '{}' does not match {}", declared, kind)));
            }
        }
        let name = match root.path(&["metadata", "name"]).as_str() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(invalid("metadata.name is required".to_string())),
        };
        if let Some(declared) = root.path(&["metadata", "namespace"]).as_str() {
            if declared != namespace {
                return Err(invalid(format!(
                    "metadata.namespace '{}' does not match the request namespace '{}'",
                    declared, namespace
                )));
            }
        }

        let mut object = manifest.clone();
        object["kind"] = json!(kind.as_str());
        if object.get("apiVersion").is_none() {
            object["apiVersion"] = json!(kind.api_version());
        }
        let metadata = &mut object["metadata"];
        metadata["namespace"] = json!(namespace);
        metadata["uid"] = json!(Uuid::new_v4().to_string());
        metadata["creationTimestamp"] = json!(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

        Ok((name, object))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list(&self, kind: ObjectKind, namespace: Option<&str>) -> Result<Vec<ObjectRef>> {
        let objects = self.objects.read().map_err(|_| OcpError::StoreLocked)?;
        let namespace = namespace.filter(|_| kind.is_namespaced());

        let refs: Vec<ObjectRef> = objects
            .keys()
            .filter(|(k, ns, _)| *k == kind && namespace.map_or(true, |want| ns == want))
            .map(|(_, ns, name)| ObjectRef {
                name: name.clone(),
                namespace: if kind.is_namespaced() { Some(ns.clone()) } else { None },
            })
            .collect();

        // Every namespace is also a project unless projects were stored explicitly
        if kind == ObjectKind::Project && refs.is_empty() {
            return Ok(objects
                .keys()
                .filter(|(k, _, _)| *k == ObjectKind::Namespace)
                .map(|(_, _, name)| ObjectRef {
                    name: name.clone(),
                    namespace: None,
                })
                .collect());
        }

        Ok(refs)
    }

    async fn get(&self, kind: ObjectKind, namespace: &str, name: &str) -> Result<Value> {
        let objects = self.objects.read().map_err(|_| OcpError::StoreLocked)?;
        let ns = if kind.is_namespaced() { namespace } else { "" };

        objects
            .get(&(kind, ns.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| OcpError::ObjectNotFound {
                kind: kind.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn create(&self, kind: ObjectKind, namespace: &str, manifest: &Value) -> Result<Value> {
        let (name, object) = Self::prepare(kind, namespace, manifest)?;

        let mut objects = self.objects.write().map_err(|_| OcpError::StoreLocked)?;
        Self::require_namespace(&objects, namespace)?;

        let key = (kind, namespace.to_string(), name.clone());
        if objects.contains_key(&key) {
            return Err(OcpError::AlreadyExists {
                kind: kind.to_string(),
                namespace: namespace.to_string(),
                name,
            });
        }

        objects.insert(key, object.clone());
        tracing::debug!(kind = %kind, namespace, name = %name, "object created");
        Ok(object)
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        pod: &str,
        container: Option<&str>,
    ) -> Result<String> {
        self.get(ObjectKind::Pod, namespace, pod).await?;

        let logs = self.logs.read().map_err(|_| OcpError::StoreLocked)?;
        let entries: Vec<&PodLog> = logs
            .iter()
            .filter(|l| l.namespace == namespace && l.pod == pod)
            .collect();

        match container {
            Some(container) => entries
                .iter()
                .find(|l| l.container.as_deref() == Some(container))
                .map(|l| l.text.clone())
                .ok_or_else(|| OcpError::ApiError {
                    reason: format!("container {} is not valid for pod {}", container, pod),
                }),
            None => match entries.as_slice() {
                [] => Ok(String::new()),
                [only] => Ok(only.text.clone()),
                many => {
                    let names: Vec<&str> =
                        many.iter().filter_map(|l| l.container.as_deref()).collect();
                    Err(OcpError::ApiError {
                        reason: format!(
                            "a container name must be specified for pod {}, choose one of: [{}]",
                            pod,
                            names.join(" ")
                        ),
                    })
                }
            },
        }
    }

    async fn namespace_phase(&self, namespace: &str) -> Result<String> {
        let object = self
            .get(ObjectKind::Namespace, "", namespace)
            .await
            .map_err(|_| OcpError::NamespaceNotFound {
                namespace: namespace.to_string(),
            })?;

        Ok(Node::new(&object)
            .path(&["status", "phase"])
            .as_str()
            .unwrap_or("Active")
            .to_string())
    }

    async fn api_versions(&self) -> Result<Vec<String>> {
        if self.api_versions.is_empty() {
            Ok(DEFAULT_API_VERSIONS.iter().map(|v| v.to_string()).collect())
        } else {
            Ok(self.api_versions.clone())
        }
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

/// Derive the map key of a stored object from its kind and metadata
fn object_key(object: &Value) -> Result<ObjectKey> {
    let root = Node::new(object);
    let kind_name = root.get("kind").str_or_empty();
    let kind = ObjectKind::from_kind(kind_name).ok_or_else(|| OcpError::InvalidObject {
        kind: kind_name.to_string(),
        reason: "unsupported kind".to_string(),
    })?;

    let name = root.path(&["metadata", "name"]).str_or_empty();
    if name.is_empty() {
        return Err(OcpError::InvalidObject {
            kind: kind.to_string(),
            reason: "metadata.name is required".to_string(),
        });
    }

    let namespace = if kind.is_namespaced() {
        match root.path(&["metadata", "namespace"]).as_str() {
            Some(ns) if !ns.is_empty() => ns,
            _ => "default",
        }
    } else {
        ""
    };

    Ok((kind, namespace.to_string(), name.to_string()))
}
