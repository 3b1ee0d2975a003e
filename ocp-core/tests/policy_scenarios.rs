//! End-to-end policy scenarios
//!
//! Security checker, compliance validator and the create gate exercised the
//! way the MCP server drives them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ocp_core::gate::{create_deployment, SECURITY_VALIDATION_FAILED};
use ocp_core::{
    check_security, validate_manifest, InMemoryObjectStore, Manifest, ObjectKind, ObjectRef,
    ObjectStore, OcpError, RecordingLogger, SecurityChecker,
};
use serde_json::{json, Value};

/// Store that counts create calls and otherwise delegates
struct CountingStore {
    inner: InMemoryObjectStore,
    creates: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        let inner = InMemoryObjectStore::new();
        inner.add_namespace("default").unwrap();
        Self {
            inner,
            creates: AtomicUsize::new(0),
        }
    }

    fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn list(&self, kind: ObjectKind, namespace: Option<&str>) -> ocp_core::Result<Vec<ObjectRef>> {
        self.inner.list(kind, namespace).await
    }

    async fn get(&self, kind: ObjectKind, namespace: &str, name: &str) -> ocp_core::Result<Value> {
        self.inner.get(kind, namespace, name).await
    }

    async fn create(&self, kind: ObjectKind, namespace: &str, manifest: &Value) -> ocp_core::Result<Value> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(kind, namespace, manifest).await
    }

    async fn pod_logs(&self, namespace: &str, pod: &str, container: Option<&str>) -> ocp_core::Result<String> {
        self.inner.pod_logs(namespace, pod, container).await
    }

    async fn namespace_phase(&self, namespace: &str) -> ocp_core::Result<String> {
        self.inner.namespace_phase(namespace).await
    }

    async fn api_versions(&self) -> ocp_core::Result<Vec<String>> {
        self.inner.api_versions().await
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Store whose create always fails
struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn list(&self, _: ObjectKind, _: Option<&str>) -> ocp_core::Result<Vec<ObjectRef>> {
        Ok(vec![])
    }

    async fn get(&self, kind: ObjectKind, namespace: &str, name: &str) -> ocp_core::Result<Value> {
        Err(OcpError::ObjectNotFound {
            kind: kind.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    async fn create(&self, _: ObjectKind, _: &str, _: &Value) -> ocp_core::Result<Value> {
        Err(OcpError::ApiError {
            reason: "admission webhook denied the request".to_string(),
        })
    }

    async fn pod_logs(&self, _: &str, _: &str, _: Option<&str>) -> ocp_core::Result<String> {
        Ok(String::new())
    }

    async fn namespace_phase(&self, _: &str) -> ocp_core::Result<String> {
        Ok("Active".to_string())
    }

    async fn api_versions(&self) -> ocp_core::Result<Vec<String>> {
        Ok(vec![])
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[test]
fn scenario_a_host_network_privileged_and_host_path() {
    let manifest = Manifest::new(json!({"spec": {"template": {"spec": {
        "hostNetwork": true,
        "containers": [{"name": "c1", "securityContext": {"privileged": true}}],
        "volumes": [{"name": "v1", "hostPath": {"path": "/etc"}}]
    }}}}));

    assert_eq!(
        check_security(&manifest),
        vec![
            "hostNetwork is disallowed for security reasons.",
            "Container 'c1' sets privileged=true, which is disallowed.",
            "Volume 'v1' uses hostPath which is disallowed.",
        ]
    );
}

#[test]
fn scenario_b_only_service_account_warning() {
    let manifest = Manifest::new(json!({
        "kind": "Deployment",
        "metadata": {"name": "foo", "labels": {"app": "foo"}},
        "spec": {"template": {"spec": {"containers": [
            {"name": "c", "resources": {"limits": {}, "requests": {}}}
        ]}}}
    }));

    let result = validate_manifest(&manifest);
    assert!(result.errors.is_empty());
    assert_eq!(
        result.warnings,
        vec!["No serviceAccountName specified. OpenShift recommends using dedicated service accounts."]
    );
}

#[tokio::test]
async fn scenario_c_violation_never_reaches_the_store() {
    let store = CountingStore::new();
    let manifest = Manifest::new(json!({
        "kind": "Deployment",
        "metadata": {"name": "web"},
        "spec": {"template": {"spec": {
            "containers": [{"name": "web", "securityContext": {"privileged": true}}]
        }}}
    }));

    let err = create_deployment(&store, &SecurityChecker::new(), "default", &manifest)
        .await
        .unwrap_err();

    assert_eq!(err.error, SECURITY_VALIDATION_FAILED);
    assert_eq!(
        err.details.as_deref(),
        Some("Container 'web' sets privileged=true, which is disallowed.")
    );
    assert_eq!(store.creates(), 0);
}

#[tokio::test]
async fn clean_manifest_is_created_once() {
    let store = CountingStore::new();
    let manifest = Manifest::new(json!({"kind": "Deployment", "metadata": {"name": "web"}}));

    let created = create_deployment(&store, &SecurityChecker::new(), "default", &manifest)
        .await
        .unwrap();

    assert_eq!(created["metadata"]["name"], "web");
    assert_eq!(store.creates(), 1);
    assert!(store.get(ObjectKind::Deployment, "default", "web").await.is_ok());
}

#[tokio::test]
async fn store_fault_becomes_failure_value() {
    let manifest = Manifest::new(json!({"kind": "Deployment", "metadata": {"name": "web"}}));

    let err = create_deployment(&FailingStore, &SecurityChecker::new(), "default", &manifest)
        .await
        .unwrap_err();

    assert_eq!(err.error, "Failed to create deployment");
    assert_eq!(
        err.details.as_deref(),
        Some("Cluster API error: admission webhook denied the request")
    );
}

#[test]
fn empty_document_reports_all_structural_errors() {
    let result = validate_manifest(&Manifest::new(json!({})));

    for expected in [
        "Manifest kind must be 'Deployment'.",
        "metadata.name is required.",
        "At least one container must be defined in spec.template.spec.containers.",
    ] {
        assert!(result.errors.iter().any(|e| e == expected), "missing: {expected}");
    }
    assert!(check_security(&Manifest::new(json!({}))).is_empty());
}

#[test]
fn privileged_count_matches_privileged_containers() {
    let containers: Vec<Value> = (0..7)
        .map(|i| json!({"name": format!("c{i}"), "securityContext": {"privileged": i % 3 == 0}}))
        .collect();
    let manifest = Manifest::new(json!({"spec": {"template": {"spec": {"containers": containers}}}}));

    let violations = check_security(&manifest);
    assert_eq!(violations.len(), 3);
    for name in ["c0", "c3", "c6"] {
        assert!(violations.iter().any(|v| v.contains(&format!("'{name}'"))));
    }
}

#[test]
fn host_path_count_ignores_value() {
    let manifest = Manifest::new(json!({"spec": {"template": {"spec": {"volumes": [
        {"name": "a", "hostPath": {}},
        {"name": "b", "hostPath": {"path": "/data", "type": "Directory"}},
        {"name": "c", "emptyDir": {}},
        {"name": "d", "hostPath": false}
    ]}}}}));

    let violations = check_security(&manifest);
    assert_eq!(violations.len(), 3);
    assert!(violations.iter().all(|v| v.ends_with("uses hostPath which is disallowed.")));
}

#[test]
fn injected_logger_sees_the_warning() {
    let recorder = Arc::new(RecordingLogger::new());
    let checker = SecurityChecker::with_logger(recorder.clone());

    checker.check(&Manifest::new(json!({"spec": {"template": {"spec": {"hostIPC": 1}}}})));
    checker.check(&Manifest::new(json!({"kind": "Deployment"})));

    let messages = recorder.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("hostIPC is disallowed for security reasons."));
}
