//! # OCP Core - manifest policy for OpenShift deployments
//!
//! OCP Core decides whether a deployment manifest may be submitted to a
//! cluster and how far it departs from OpenShift recommendations:
//!
//! - **Security policy** ([`SecurityChecker`]): a denylist of host-level and
//!   privileged pod settings. A non-empty result blocks creation.
//! - **Compliance** ([`ComplianceValidator`]): structural errors and advisory
//!   warnings. Never blocks anything.
//! - **Gate** ([`gate::create_deployment`]): runs the security check, then
//!   hands the manifest to an [`ObjectStore`] only if it passed.
//!
//! Manifests are untyped documents; a missing field means "rule does not
//! apply", never an error.
//!
//! ## Example
//!
//! ```rust
//! use ocp_core::{check_security, validate_manifest, Manifest};
//! use serde_json::json;
//!
//! let manifest = Manifest::new(json!({
//!     "kind": "Deployment",
//!     "metadata": {"name": "web", "labels": {"app": "web"}},
//!     "spec": {"template": {"spec": {
//!         "hostNetwork": true,
//!         "containers": [{"name": "app"}]
//!     }}}
//! }));
//!
//! let violations = check_security(&manifest);
//! assert_eq!(violations, vec!["hostNetwork is disallowed for security reasons."]);
//!
//! let result = validate_manifest(&manifest);
//! assert!(result.is_compliant());
//! assert!(!result.warnings.is_empty());
//! ```

pub mod error;
pub mod gate;
pub mod manifest;
pub mod policy;
pub mod store;

// Re-export main types
pub use error::{ErrorCategory, ErrorResponse, OcpError, Result};
pub use manifest::{Manifest, Node};
pub use policy::{
    check_security, validate_manifest, ComplianceValidator, PolicyLogger, RecordingLogger,
    SecurityChecker, SecurityRule, TracingLogger, ValidationResult,
};
pub use store::{ClusterSnapshot, InMemoryObjectStore, ObjectKind, ObjectRef, ObjectStore};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checkers_are_independent() {
        // Fails security, passes compliance
        let manifest = Manifest::new(json!({
            "kind": "Deployment",
            "metadata": {"name": "agent", "labels": {"app": "agent"}},
            "spec": {"template": {"spec": {
                "hostPID": true,
                "serviceAccountName": "agent",
                "containers": [{
                    "name": "agent",
                    "resources": {"limits": {"memory": "128Mi"}, "requests": {"memory": "64Mi"}}
                }]
            }}}
        }));

        assert_eq!(check_security(&manifest).len(), 1);
        let result = validate_manifest(&manifest);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_repeated_calls_give_identical_results() {
        let manifest = Manifest::new(json!({
            "spec": {"template": {"spec": {
                "hostNetwork": true,
                "volumes": [{"name": "v", "hostPath": {"path": "/var/run"}}]
            }}}
        }));

        let checker = SecurityChecker::new();
        let validator = ComplianceValidator::new();
        assert_eq!(checker.check(&manifest), checker.check(&manifest));
        assert_eq!(validator.validate(&manifest), validator.validate(&manifest));
    }
}
