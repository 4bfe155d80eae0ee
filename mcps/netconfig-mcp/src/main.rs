//! Network Config MCP Server
//!
//! # Usage
//!
//! Run directly: `netconfig-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "netconfig": { "command": "./netconfig-mcp" } } }
//! ```

use anyhow::Result;
use rmcp::ServiceExt;

use netconfig_mcp::NetconfigMcpServer;
use netinspect::{logging, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load(None)?;
    logging::init_tracing("netconfig_mcp", &config.logging)?;

    tracing::info!("Starting netconfig_mcp MCP Server");
    if let Some(path) = &config.loaded_from {
        tracing::info!("Loaded config from {}", path.display());
    }

    let server = NetconfigMcpServer::from_config(&config);
    let service = server.serve(rmcp::transport::stdio()).await?;

    tracing::info!("Server running, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
