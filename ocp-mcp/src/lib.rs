//! OCP MCP Server Library
//!
//! This crate exposes an OpenShift cluster to agents over the Model Context
//! Protocol: read-only listing tools, security-gated deployment creation,
//! manifest validation, `cluster://` resources and convenience prompts.
//!
//! ## Architecture
//!
//! ```text
//! Agent
//!        │  JSON-RPC over stdio
//!        ▼
//! ┌─────────────────┐
//! │   MCP Server    │ ◄── This crate
//! │                 │
//! │  ┌───────────┐  │
//! │  │   Tools   │  │ - list_namespaces, list_pods, get_pod_logs
//! │  │           │  │ - list/get deployments, routes, services
//! │  │           │  │ - create_deployment (gated)
//! │  │           │  │ - validate_openshift_manifest
//! │  └───────────┘  │
//! │  ┌───────────┐  │
//! │  │ Resources │  │ - cluster://services/{namespace}
//! │  │           │  │ - cluster://info, cluster://pods/{namespace}, ...
//! │  └───────────┘  │
//! │  ┌───────────┐  │
//! │  │  Prompts  │  │ - prompt_list_pods, prompt_get_route, ...
//! │  └───────────┘  │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    ocp-core     │
//! │ security │ gate │
//! │ compliance│store│
//! └─────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ocp_mcp::{OcpMcpServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let store = config.open_store().unwrap();
//!     let server = OcpMcpServer::new(Arc::new(store), config);
//!     server.run_stdio().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod tools;

pub use config::ServerConfig;
pub use error::{McpError, McpResult};
pub use server::{McpRequest, McpResponse, OcpMcpServer, RpcError};

/// Server name reported during `initialize`
pub const SERVER_NAME: &str = "openshift-mcp-server";

/// Server version reported during `initialize`
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";
