//! Cluster object store
//!
//! The server never talks to the orchestration API directly; it goes through
//! [`ObjectStore`], a namespaced store queryable by kind plus a create
//! endpoint. [`InMemoryObjectStore`] backs tests and offline use from a
//! snapshot file. A live cluster client plugs in by implementing the trait.
//!
//! # Example
//!
//! ```rust
//! use ocp_core::store::{InMemoryObjectStore, ObjectKind, ObjectStore};
//! use serde_json::json;
//!
//! # tokio_test_block_on(async {
//! let store = InMemoryObjectStore::new();
//! store.add_namespace("demo").unwrap();
//! store.insert(json!({
//!     "kind": "Service",
//!     "metadata": {"name": "web", "namespace": "demo"}
//! })).unwrap();
//!
//! let services = store.list(ObjectKind::Service, Some("demo")).await.unwrap();
//! assert_eq!(services[0].name, "web");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod kind;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

pub use kind::ObjectKind;
pub use memory::{ClusterSnapshot, InMemoryObjectStore, PodLog};

/// Name (and namespace, for namespaced kinds) of a listed object
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Namespaced object store over a cluster API
///
/// All methods take `&self`; implementations use interior mutability.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects of `kind`. `None` lists across all namespaces; cluster
    /// scoped kinds ignore the namespace.
    async fn list(&self, kind: ObjectKind, namespace: Option<&str>) -> Result<Vec<ObjectRef>>;

    /// Read one object
    async fn get(&self, kind: ObjectKind, namespace: &str, name: &str) -> Result<Value>;

    /// Create an object from a manifest and return it as stored
    async fn create(&self, kind: ObjectKind, namespace: &str, manifest: &Value) -> Result<Value>;

    /// Read a pod's log, optionally for one container
    async fn pod_logs(&self, namespace: &str, pod: &str, container: Option<&str>)
        -> Result<String>;

    /// Lifecycle phase of a namespace (e.g. `Active`)
    async fn namespace_phase(&self, namespace: &str) -> Result<String>;

    /// API group versions served by the cluster
    async fn api_versions(&self) -> Result<Vec<String>>;

    /// Backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}
