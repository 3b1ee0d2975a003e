//! Object kinds reachable through the object store

use serde::{Deserialize, Serialize};

/// Kinds of cluster objects the server can list, read or create
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Namespace,
    Project,
    Pod,
    Deployment,
    Service,
    Route,
    ConfigMap,
    Secret,
    Job,
    PersistentVolumeClaim,
    Ingress,
    RoleBinding,
    ServiceAccount,
    ResourceQuota,
    Event,
}

impl ObjectKind {
    /// Every kind, in a stable order
    pub const ALL: [ObjectKind; 15] = [
        ObjectKind::Namespace,
        ObjectKind::Project,
        ObjectKind::Pod,
        ObjectKind::Deployment,
        ObjectKind::Service,
        ObjectKind::Route,
        ObjectKind::ConfigMap,
        ObjectKind::Secret,
        ObjectKind::Job,
        ObjectKind::PersistentVolumeClaim,
        ObjectKind::Ingress,
        ObjectKind::RoleBinding,
        ObjectKind::ServiceAccount,
        ObjectKind::ResourceQuota,
        ObjectKind::Event,
    ];

    /// The `kind` field value
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Namespace => "Namespace",
            ObjectKind::Project => "Project",
            ObjectKind::Pod => "Pod",
            ObjectKind::Deployment => "Deployment",
            ObjectKind::Service => "Service",
            ObjectKind::Route => "Route",
            ObjectKind::ConfigMap => "ConfigMap",
            ObjectKind::Secret => "Secret",
            ObjectKind::Job => "Job",
            ObjectKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            ObjectKind::Ingress => "Ingress",
            ObjectKind::RoleBinding => "RoleBinding",
            ObjectKind::ServiceAccount => "ServiceAccount",
            ObjectKind::ResourceQuota => "ResourceQuota",
            ObjectKind::Event => "Event",
        }
    }

    /// Lower-case plural used in API paths
    pub fn plural(&self) -> &'static str {
        match self {
            ObjectKind::Namespace => "namespaces",
            ObjectKind::Project => "projects",
            ObjectKind::Pod => "pods",
            ObjectKind::Deployment => "deployments",
            ObjectKind::Service => "services",
            ObjectKind::Route => "routes",
            ObjectKind::ConfigMap => "configmaps",
            ObjectKind::Secret => "secrets",
            ObjectKind::Job => "jobs",
            ObjectKind::PersistentVolumeClaim => "persistentvolumeclaims",
            ObjectKind::Ingress => "ingresses",
            ObjectKind::RoleBinding => "rolebindings",
            ObjectKind::ServiceAccount => "serviceaccounts",
            ObjectKind::ResourceQuota => "resourcequotas",
            ObjectKind::Event => "events",
        }
    }

    /// `apiVersion` for objects of this kind
    pub fn api_version(&self) -> &'static str {
        match self {
            ObjectKind::Project => "project.openshift.io/v1",
            ObjectKind::Route => "route.openshift.io/v1",
            ObjectKind::Deployment => "apps/v1",
            ObjectKind::Job => "batch/v1",
            ObjectKind::Ingress => "networking.k8s.io/v1",
            ObjectKind::RoleBinding => "rbac.authorization.k8s.io/v1",
            _ => "v1",
        }
    }

    /// Whether objects of this kind live inside a namespace
    pub fn is_namespaced(&self) -> bool {
        !matches!(self, ObjectKind::Namespace | ObjectKind::Project)
    }

    /// Parse a `kind` field value
    pub fn from_kind(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
