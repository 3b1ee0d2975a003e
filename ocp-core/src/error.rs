//! Error types for OCP operations
//!
//! Two kinds of failure live here:
//!
//! - [`OcpError`] is the Rust error returned by fallible library calls
//!   (manifest parsing, object-store access). Each variant carries a stable
//!   error code and a category.
//! - [`ErrorResponse`] is the `{error, details}` value handed back to tool
//!   callers when an operation fails. Policy violations are reported this
//!   way, as data, never as a raised error.
//!
//! # Example
//!
//! ```rust
//! use ocp_core::error::{ErrorCategory, OcpError};
//!
//! let err = OcpError::ObjectNotFound {
//!     kind: "Service".to_string(),
//!     namespace: "demo".to_string(),
//!     name: "web".to_string(),
//! };
//! assert_eq!(err.category(), ErrorCategory::NotFound);
//! assert_eq!(err.error_code(), "OBJECT_NOT_FOUND");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for OCP operations
pub type Result<T> = std::result::Result<T, OcpError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Object or namespace not found
    NotFound,
    /// Input could not be parsed or is structurally unusable
    Validation,
    /// Object already exists
    Conflict,
    /// Internal error
    Internal,
    /// External service or I/O error
    External,
}

/// Errors that can occur in OCP operations
#[derive(Error, Debug)]
pub enum OcpError {
    // ═══════════════════════════════════════════════════════════════════════
    // Manifest input errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Manifest text could not be turned into a document
    #[error("Invalid manifest: {reason}")]
    InvalidManifest { reason: String },

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML deserialization failed
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// I/O operation failed
    #[error("IO error: {message}")]
    IoError { message: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Object store errors
    // ═══════════════════════════════════════════════════════════════════════

    /// No object with this kind/namespace/name exists
    #[error("{kind} '{name}' not found in namespace '{namespace}'")]
    ObjectNotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    /// Namespace does not exist
    #[error("Namespace not found: '{namespace}'")]
    NamespaceNotFound { namespace: String },

    /// Create conflicted with an existing object
    #[error("{kind} '{name}' already exists in namespace '{namespace}'")]
    AlreadyExists {
        kind: String,
        namespace: String,
        name: String,
    },

    /// Object submitted to the store is unusable (e.g. no metadata.name)
    #[error("Invalid {kind} object: {reason}")]
    InvalidObject { kind: String, reason: String },

    /// The cluster API rejected or failed the call
    #[error("Cluster API error: {reason}")]
    ApiError { reason: String },

    /// Store lock is poisoned (panic occurred while holding lock)
    #[error("Object store lock poisoned. This is a bug; please report it.")]
    StoreLocked,
}

impl OcpError {
    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            OcpError::ObjectNotFound { .. } | OcpError::NamespaceNotFound { .. } => {
                ErrorCategory::NotFound
            }

            OcpError::InvalidManifest { .. }
            | OcpError::InvalidObject { .. }
            | OcpError::JsonError(_)
            | OcpError::YamlError(_) => ErrorCategory::Validation,

            OcpError::AlreadyExists { .. } => ErrorCategory::Conflict,

            OcpError::StoreLocked => ErrorCategory::Internal,

            OcpError::IoError { .. } | OcpError::ApiError { .. } => ErrorCategory::External,
        }
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            OcpError::InvalidManifest { .. } => "INVALID_MANIFEST",
            OcpError::JsonError(_) => "JSON_ERROR",
            OcpError::YamlError(_) => "YAML_ERROR",
            OcpError::IoError { .. } => "IO_ERROR",
            OcpError::ObjectNotFound { .. } => "OBJECT_NOT_FOUND",
            OcpError::NamespaceNotFound { .. } => "NAMESPACE_NOT_FOUND",
            OcpError::AlreadyExists { .. } => "ALREADY_EXISTS",
            OcpError::InvalidObject { .. } => "INVALID_OBJECT",
            OcpError::ApiError { .. } => "API_ERROR",
            OcpError::StoreLocked => "STORE_LOCKED",
        }
    }

    /// Returns true if this error might succeed on retry
    pub fn is_recoverable(&self) -> bool {
        matches!(self, OcpError::ApiError { .. } | OcpError::StoreLocked)
    }
}

impl From<std::io::Error> for OcpError {
    fn from(err: std::io::Error) -> Self {
        OcpError::IoError {
            message: err.to_string(),
        }
    }
}

/// Failure value returned to tool callers
///
/// Serializes as `{"error": "..."}` or `{"error": "...", "details": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short description of what failed
    pub error: String,

    /// Underlying cause, omitted when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a response with no details
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Attach details; an empty string leaves details unset
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        let details = details.into();
        self.details = if details.is_empty() { None } else { Some(details) };
        self
    }

    /// Render as a JSON value
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.error, details),
            None => f.write_str(&self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            OcpError::NamespaceNotFound {
                namespace: "x".to_string()
            }
            .error_code(),
            "NAMESPACE_NOT_FOUND"
        );
        assert_eq!(OcpError::StoreLocked.error_code(), "STORE_LOCKED");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            OcpError::AlreadyExists {
                kind: "Deployment".to_string(),
                namespace: "ns".to_string(),
                name: "web".to_string(),
            }
            .category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            OcpError::InvalidManifest {
                reason: "empty".to_string()
            }
            .category(),
            ErrorCategory::Validation
        );
        assert!(OcpError::StoreLocked.is_recoverable());
    }

    #[test]
    fn test_object_not_found_message() {
        let err = OcpError::ObjectNotFound {
            kind: "Route".to_string(),
            namespace: "shop".to_string(),
            name: "front".to_string(),
        };
        assert_eq!(err.to_string(), "Route 'front' not found in namespace 'shop'");
    }

    #[test]
    fn test_error_response_omits_empty_details() {
        let bare = ErrorResponse::new("Failed to get pod logs").with_details("");
        assert_eq!(bare.to_value(), serde_json::json!({"error": "Failed to get pod logs"}));

        let full = ErrorResponse::new("Security validation failed").with_details("a; b");
        assert_eq!(
            full.to_value(),
            serde_json::json!({"error": "Security validation failed", "details": "a; b"})
        );
        assert_eq!(full.to_string(), "Security validation failed: a; b");
    }
}
