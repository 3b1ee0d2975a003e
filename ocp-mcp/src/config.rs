//! Server configuration
//!
//! Every setting can come from a flag or an environment variable; flags win.

use std::path::PathBuf;

use clap::Parser;
use ocp_core::{ClusterSnapshot, InMemoryObjectStore};

use crate::error::McpResult;

/// Namespace used when a prompt names none
pub const DEFAULT_NAMESPACE: &str = "default";

/// Log filter used when neither `RUST_LOG` nor `--log-filter` is set
pub const DEFAULT_LOG_FILTER: &str = "ocp_mcp=info,ocp_core=info";

/// Command-line and environment configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "ocp-mcp-server")]
#[command(about = "OpenShift MCP server with security-gated deployment creation")]
#[command(version)]
pub struct ServerConfig {
    /// Cluster snapshot (JSON or YAML) that seeds the in-memory object store
    #[arg(long, env = "OCP_MCP_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Namespace used by prompts when none is given
    #[arg(long, env = "OCP_MCP_DEFAULT_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub default_namespace: String,

    /// tracing filter directives (RUST_LOG takes precedence)
    #[arg(long, default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            snapshot: None,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Build the object store: the snapshot's content if one is configured,
    /// otherwise an empty cluster holding only the default namespace.
    pub fn open_store(&self) -> McpResult<InMemoryObjectStore> {
        let store = match &self.snapshot {
            Some(path) => {
                let snapshot = ClusterSnapshot::from_path(path)?;
                tracing::info!(
                    "Loaded cluster snapshot {} ({} objects)",
                    path.display(),
                    snapshot.objects.len()
                );
                InMemoryObjectStore::from_snapshot(snapshot)?
            }
            None => InMemoryObjectStore::new(),
        };
        store.add_namespace(&self.default_namespace)?;
        Ok(store)
    }
}
