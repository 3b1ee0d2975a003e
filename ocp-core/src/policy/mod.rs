//! Manifest policy engine
//!
//! Two independent checks run over a [`Manifest`](crate::Manifest):
//!
//! 1. [`SecurityChecker`] - denylist of host-level and privileged settings.
//!    Its result gates any create call against the cluster.
//! 2. [`ComplianceValidator`] - structural errors and best-practice warnings.
//!    Advisory only; nothing gates on it.
//!
//! Both are pure functions of the document. The only side effect anywhere in
//! this module is the warning the security checker emits through its
//! [`PolicyLogger`] when it finds violations.

mod compliance;
mod security;

use std::sync::Mutex;

pub use compliance::{validate_manifest, ComplianceValidator, ValidationResult};
pub use security::{check_security, SecurityChecker, SecurityRule};

/// Sink for the security checker's warning emission
pub trait PolicyLogger: Send + Sync {
    /// Record a warning-level message
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl PolicyLogger for TracingLogger {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "ocp_core::policy", "{}", message);
    }
}

/// Keeps every warning in memory, for assertions in tests
#[derive(Debug, Default)]
pub struct RecordingLogger {
    messages: Mutex<Vec<String>>,
}

impl RecordingLogger {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Number of messages recorded so far
    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PolicyLogger for RecordingLogger {
    fn warn(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
