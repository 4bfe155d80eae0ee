//! Network Config MCP Library
//!
//! Exposes the active network configuration of the host as MCP tools:
//! the flat plugin-style map, the typed snapshot and the host capability
//! level.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use netconfig_mcp::NetconfigMcpServer;
//!
//! let server = NetconfigMcpServer::new();
//! let result = server.call_tool("get_network_config", serde_json::json!({})).await?;
//! ```
//!
//! # Usage as Binary
//!
//! Run directly: `netconfig-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "netconfig": { "command": "./netconfig-mcp" } } }
//! ```

pub mod error;
pub mod server;

pub use error::{ToolCallError, ToolCallResult};
pub use server::NetconfigMcpServer;
