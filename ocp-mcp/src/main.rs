//! OCP MCP Server Binary
//!
//! Serves an OpenShift cluster to agents over the Model Context Protocol.
//!
//! ## Usage
//!
//! ```bash
//! # Run as MCP server (stdio) over an empty cluster
//! ocp-mcp-server
//!
//! # Seed the object store from a snapshot
//! OCP_MCP_SNAPSHOT=./cluster.yaml ocp-mcp-server --default-namespace shop
//! ```

use std::sync::Arc;

use clap::Parser;
use ocp_mcp::{OcpMcpServer, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();

    // Logs go to stderr so stdout stays a clean protocol channel
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting OCP MCP Server v{}", ocp_mcp::SERVER_VERSION);

    let store = config.open_store()?;
    let server = OcpMcpServer::new(Arc::new(store), config);
    server.run_stdio().await?;

    Ok(())
}
