//! Security denylist for pod specifications
//!
//! Rules run in a fixed order and every match is collected:
//! host network, privileged containers, host PID, host IPC, hostPath volumes.
//! The order only affects message order, never the pass/fail outcome.

use std::sync::Arc;

use crate::manifest::{entry_name, Manifest, Node};

use super::{PolicyLogger, TracingLogger};

/// One denylisted configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityRule {
    /// `hostNetwork` is truthy
    HostNetwork,
    /// A container's `securityContext.privileged` is truthy
    PrivilegedContainer,
    /// `hostPID` is truthy
    HostPid,
    /// `hostIPC` is truthy
    HostIpc,
    /// A volume carries a `hostPath` key
    HostPathVolume,
}

impl SecurityRule {
    /// All rules in evaluation order
    pub const ALL: [SecurityRule; 5] = [
        SecurityRule::HostNetwork,
        SecurityRule::PrivilegedContainer,
        SecurityRule::HostPid,
        SecurityRule::HostIpc,
        SecurityRule::HostPathVolume,
    ];

    /// Stable identifier
    pub fn key(&self) -> &'static str {
        match self {
            SecurityRule::HostNetwork => "host-network",
            SecurityRule::PrivilegedContainer => "privileged-container",
            SecurityRule::HostPid => "host-pid",
            SecurityRule::HostIpc => "host-ipc",
            SecurityRule::HostPathVolume => "host-path-volume",
        }
    }

    /// One-line description
    pub fn description(&self) -> &'static str {
        match self {
            SecurityRule::HostNetwork => "Pod shares the host's network namespace",
            SecurityRule::PrivilegedContainer => "Container runs in privileged mode",
            SecurityRule::HostPid => "Pod shares the host's PID namespace",
            SecurityRule::HostIpc => "Pod shares the host's IPC namespace",
            SecurityRule::HostPathVolume => "Volume binds a path from the host filesystem",
        }
    }

    /// Append this rule's violations for `pod_spec` to `violations`
    fn evaluate(&self, pod_spec: &Node<'_>, violations: &mut Vec<String>) {
        match self {
            SecurityRule::HostNetwork => {
                if pod_spec.get("hostNetwork").is_truthy() {
                    violations.push("hostNetwork is disallowed for security reasons.".to_string());
                }
            }
            SecurityRule::PrivilegedContainer => {
                for container in pod_spec.get("containers").items() {
                    if container.path(&["securityContext", "privileged"]).is_truthy() {
                        violations.push(format!(
                            "Container '{}' sets privileged=true, which is disallowed.",
                            entry_name(&container)
                        ));
                    }
                }
            }
            SecurityRule::HostPid => {
                if pod_spec.get("hostPID").is_truthy() {
                    violations.push("hostPID is disallowed for security reasons.".to_string());
                }
            }
            SecurityRule::HostIpc => {
                if pod_spec.get("hostIPC").is_truthy() {
                    violations.push("hostIPC is disallowed for security reasons.".to_string());
                }
            }
            SecurityRule::HostPathVolume => {
                for volume in pod_spec.get("volumes").items() {
                    if volume.has("hostPath") {
                        violations.push(format!(
                            "Volume '{}' uses hostPath which is disallowed.",
                            entry_name(&volume)
                        ));
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for SecurityRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Checks a manifest's pod spec against the security denylist
#[derive(Clone)]
pub struct SecurityChecker {
    logger: Arc<dyn PolicyLogger>,
}

impl SecurityChecker {
    /// Checker that reports through `tracing`
    pub fn new() -> Self {
        Self {
            logger: Arc::new(TracingLogger),
        }
    }

    /// Checker that reports through `logger`
    pub fn with_logger(logger: Arc<dyn PolicyLogger>) -> Self {
        Self { logger }
    }

    /// Return every violation message, in rule order.
    ///
    /// An empty vector means the manifest passes. When anything is found,
    /// one warning listing all messages goes to the logger.
    pub fn check(&self, manifest: &Manifest) -> Vec<String> {
        let pod_spec = manifest.pod_spec();
        let mut violations = Vec::new();

        for rule in SecurityRule::ALL {
            rule.evaluate(&pod_spec, &mut violations);
        }

        if !violations.is_empty() {
            self.logger
                .warn(&format!("Security checks failed: {:?}", violations));
        }

        violations
    }
}

impl Default for SecurityChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SecurityChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityChecker").finish_non_exhaustive()
    }
}

/// Run the security checker with the default `tracing` logger
pub fn check_security(manifest: &Manifest) -> Vec<String> {
    SecurityChecker::new().check(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RecordingLogger;
    use serde_json::json;

    fn checker() -> (SecurityChecker, Arc<RecordingLogger>) {
        let recorder = Arc::new(RecordingLogger::new());
        (SecurityChecker::with_logger(recorder.clone()), recorder)
    }

    #[test]
    fn test_clean_manifest_passes_silently() {
        let (checker, recorder) = checker();
        let manifest = Manifest::new(json!({
            "spec": {"template": {"spec": {
                "hostNetwork": false,
                "containers": [{"name": "app", "securityContext": {"privileged": false}}],
                "volumes": [{"name": "cfg", "configMap": {"name": "cfg"}}]
            }}}
        }));

        assert!(checker.check(&manifest).is_empty());
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_rule_order() {
        let (checker, _) = checker();
        let manifest = Manifest::new(json!({
            "spec": {"template": {"spec": {
                "hostIPC": true,
                "hostPID": true,
                "volumes": [{"name": "root", "hostPath": {"path": "/"}}],
                "containers": [{"name": "c", "securityContext": {"privileged": true}}],
                "hostNetwork": true
            }}}
        }));

        assert_eq!(
            checker.check(&manifest),
            vec![
                "hostNetwork is disallowed for security reasons.",
                "Container 'c' sets privileged=true, which is disallowed.",
                "hostPID is disallowed for security reasons.",
                "hostIPC is disallowed for security reasons.",
                "Volume 'root' uses hostPath which is disallowed.",
            ]
        );
    }

    #[test]
    fn test_unnamed_entries_use_empty_name() {
        let (checker, _) = checker();
        let manifest = Manifest::new(json!({
            "spec": {"template": {"spec": {
                "containers": [{"securityContext": {"privileged": true}}],
                "volumes": [{"hostPath": {}}]
            }}}
        }));

        assert_eq!(
            checker.check(&manifest),
            vec![
                "Container '' sets privileged=true, which is disallowed.",
                "Volume '' uses hostPath which is disallowed.",
            ]
        );
    }

    #[test]
    fn test_host_path_key_presence_triggers_even_when_null() {
        let (checker, _) = checker();
        let manifest = Manifest::new(json!({
            "spec": {"template": {"spec": {"volumes": [{"name": "v", "hostPath": null}]}}}
        }));
        assert_eq!(checker.check(&manifest).len(), 1);
    }

    #[test]
    fn test_string_flags_follow_truthiness() {
        let (checker, _) = checker();
        let manifest = Manifest::new(json!({
            "spec": {"template": {"spec": {"hostNetwork": "yes", "hostPID": ""}}}
        }));
        assert_eq!(
            checker.check(&manifest),
            vec!["hostNetwork is disallowed for security reasons."]
        );
    }

    #[test]
    fn test_warning_lists_all_violations_once() {
        let (checker, recorder) = checker();
        let manifest = Manifest::new(json!({
            "spec": {"template": {"spec": {"hostPID": true, "hostIPC": true}}}
        }));

        let violations = checker.check(&manifest);
        let messages = recorder.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Security checks failed:"));
        for violation in &violations {
            assert!(messages[0].contains(violation.as_str()));
        }
    }

    #[test]
    fn test_malformed_shapes_do_not_fault() {
        let (checker, _) = checker();
        for doc in [
            json!(null),
            json!("text"),
            json!({"spec": []}),
            json!({"spec": {"template": {"spec": {"containers": "c", "volumes": {"a": 1}}}}}),
            json!({"spec": {"template": {"spec": {"containers": [1, null, []]}}}}),
        ] {
            assert!(checker.check(&Manifest::new(doc)).is_empty());
        }
    }

    #[test]
    fn test_rule_keys_are_unique() {
        let keys: std::collections::HashSet<&str> =
            SecurityRule::ALL.iter().map(|r| r.key()).collect();
        assert_eq!(keys.len(), SecurityRule::ALL.len());
    }
}
