//! Security-gated deployment creation
//!
//! The security check runs to completion before the store is touched. A
//! manifest with any violation never reaches [`ObjectStore::create`].

use serde_json::Value;

use crate::error::ErrorResponse;
use crate::manifest::Manifest;
use crate::policy::SecurityChecker;
use crate::store::{ObjectKind, ObjectStore};

/// Error text returned when the security check rejects a manifest
pub const SECURITY_VALIDATION_FAILED: &str = "Security validation failed";

/// Error text returned when the store rejects a create
pub const CREATE_DEPLOYMENT_FAILED: &str = "Failed to create deployment";

/// Check `manifest` and, if it passes, create it as a Deployment in `namespace`.
///
/// Violations come back as `Security validation failed` with the messages
/// joined by `"; "`. Store faults come back as `Failed to create deployment`
/// with the fault text.
pub async fn create_deployment<S>(
    store: &S,
    checker: &SecurityChecker,
    namespace: &str,
    manifest: &Manifest,
) -> Result<Value, ErrorResponse>
where
    S: ObjectStore + ?Sized,
{
    let violations = checker.check(manifest);
    if !violations.is_empty() {
        tracing::error!(
            "Security validation errors for deployment in {}: {:?}",
            namespace,
            violations
        );
        return Err(ErrorResponse::new(SECURITY_VALIDATION_FAILED).with_details(violations.join("; ")));
    }

    match store
        .create(ObjectKind::Deployment, namespace, manifest.as_value())
        .await
    {
        Ok(created) => {
            tracing::info!(
                namespace,
                name = manifest.name().unwrap_or_default(),
                backend = store.name(),
                "deployment created"
            );
            Ok(created)
        }
        Err(e) => {
            tracing::error!("Failed to create deployment in {}: {}", namespace, e);
            Err(ErrorResponse::new(CREATE_DEPLOYMENT_FAILED).with_details(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryObjectStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_store_fault_is_translated() {
        let store = InMemoryObjectStore::new();
        let manifest = Manifest::new(json!({"kind": "Deployment", "metadata": {"name": "web"}}));

        let err = create_deployment(&store, &SecurityChecker::new(), "missing", &manifest)
            .await
            .unwrap_err();

        assert_eq!(err.error, CREATE_DEPLOYMENT_FAILED);
        assert_eq!(err.details.as_deref(), Some("Namespace not found: 'missing'"));
    }

    #[tokio::test]
    async fn test_violations_are_joined() {
        let store = InMemoryObjectStore::new();
        store.add_namespace("default").unwrap();
        let manifest = Manifest::new(json!({
            "metadata": {"name": "web"},
            "spec": {"template": {"spec": {"hostPID": true, "hostIPC": true}}}
        }));

        let err = create_deployment(&store, &SecurityChecker::new(), "default", &manifest)
            .await
            .unwrap_err();

        assert_eq!(err.error, SECURITY_VALIDATION_FAILED);
        assert_eq!(
            err.details.as_deref(),
            Some("hostPID is disallowed for security reasons.; hostIPC is disallowed for security reasons.")
        );
        assert_eq!(store.len(), 1);
    }
}
