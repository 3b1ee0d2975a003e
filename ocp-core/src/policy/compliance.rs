//! Manifest compliance validation
//!
//! Errors mark a manifest as non-compliant (wrong kind, no name, no
//! containers). Warnings are best-practice recommendations and never block
//! anything.

use serde::{Deserialize, Serialize};

use crate::manifest::{entry_name, Manifest};

/// Outcome of a compliance check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Hard failures
    pub errors: Vec<String>,

    /// Recommendations
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Add a warning
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// True when there are no errors. Warnings do not count.
    pub fn is_compliant(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "{}: {} errors, {} warnings",
            if self.is_compliant() { "COMPLIANT" } else { "NON-COMPLIANT" },
            self.errors.len(),
            self.warnings.len()
        )
    }
}

/// Structural and best-practice checks for Deployment manifests
#[derive(Debug, Clone, Default)]
pub struct ComplianceValidator;

impl ComplianceValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a manifest
    pub fn validate(&self, manifest: &Manifest) -> ValidationResult {
        let mut result = ValidationResult::new();

        self.validate_structure(manifest, &mut result);
        self.check_recommendations(manifest, &mut result);

        result
    }

    fn validate_structure(&self, manifest: &Manifest, result: &mut ValidationResult) {
        if manifest.kind() != Some("Deployment") {
            result.add_error("Manifest kind must be 'Deployment'.");
        }

        if !manifest.metadata().get("name").is_truthy() {
            result.add_error("metadata.name is required.");
        }

        if manifest.containers().next().is_none() {
            result.add_error(
                "At least one container must be defined in spec.template.spec.containers.",
            );
        }
    }

    fn check_recommendations(&self, manifest: &Manifest, result: &mut ValidationResult) {
        let pod_spec = manifest.pod_spec();

        // Key presence, not value: an explicit hostNetwork: false is still flagged
        if pod_spec.has("hostNetwork") {
            result.add_warning("hostNetwork is discouraged in OpenShift unless absolutely required.");
        }

        for container in manifest.containers() {
            let resources = container.get("resources");
            if !resources.get("limits").is_present() || !resources.get("requests").is_present() {
                result.add_warning(format!(
                    "Container '{}' should specify resource requests and limits.",
                    entry_name(&container)
                ));
            }
        }

        if pod_spec.path(&["securityContext", "runAsUser"]).is_zero() {
            result.add_warning("Running as root (runAsUser: 0) is discouraged in OpenShift.");
        }

        for container in manifest.containers() {
            if container.get("imagePullPolicy").as_str() == Some("Always") {
                result.add_warning(format!(
                    "Container '{}' uses imagePullPolicy: Always. Make sure this is intended.",
                    entry_name(&container)
                ));
            }
        }

        if !pod_spec.has("serviceAccountName") {
            result.add_warning(
                "No serviceAccountName specified. OpenShift recommends using dedicated service accounts.",
            );
        }

        if !manifest.metadata().path(&["labels", "app"]).is_truthy() {
            result.add_warning("metadata.labels.app is recommended for OpenShift apps.");
        }
    }
}

/// Validate with a default [`ComplianceValidator`]
pub fn validate_manifest(manifest: &Manifest) -> ValidationResult {
    ComplianceValidator::new().validate(manifest)
}
