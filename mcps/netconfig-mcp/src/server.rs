//! MCP Server implementation for network configuration

use std::time::Duration;

use netinspect::{platform, to_bridge_map, Config, NetworkInspector};
use rmcp::{
    handler::server::router::tool::ToolRouter,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{query_failure, ToolCallError, ToolCallResult};

const SERVER_DESCRIPTION: &str = "Network Configuration MCP Server - provides tools for \
     reading the active network's address, gateway, DNS servers, WiFi link and transports.";

/// The main Network Config MCP Server
#[derive(Clone)]
pub struct NetconfigMcpServer {
    inspector: NetworkInspector,
    timeout: Duration,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl NetconfigMcpServer {
    /// Server reading the local host with default configuration
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_inspector(platform::host_inspector(config), config.query_timeout())
    }

    /// Server over a caller-built inspector
    pub fn with_inspector(inspector: NetworkInspector, timeout: Duration) -> Self {
        Self {
            inspector,
            timeout,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Get the active network configuration as a flat map: ipAddress, subnetMask, gateway, dns1, dns2, ssid, bssid, rssi, linkSpeed, frequency, interfaceName, mtu, hasWifi/hasCellular/hasEthernet, connectionType and bandwidth. Absent values are omitted."
    )]
    async fn get_network_config(&self) -> Result<CallToolResult, McpError> {
        let snapshot = self.blocking(|inspector| inspector.inspect()).await?.map_err(query_failure)?;
        json_success(&Value::Object(to_bridge_map(&snapshot)))
    }

    #[tool(
        description = "Get a typed snapshot of the active network (camelCase fields, dnsServers list, transports set). Absent values are omitted."
    )]
    async fn get_network_snapshot(&self) -> Result<CallToolResult, McpError> {
        let snapshot = self.blocking(|inspector| inspector.inspect()).await?.map_err(query_failure)?;
        json_success(&snapshot)
    }

    #[tool(
        description = "Report which capability-gated fields (WiFi frequency, link bandwidth) this host can provide"
    )]
    async fn get_host_capabilities(&self) -> Result<CallToolResult, McpError> {
        let capabilities = self.blocking(|inspector| inspector.capabilities()).await?;
        json_success(&capabilities)
    }
}

impl NetconfigMcpServer {
    /// Run an inspector call off the async runtime, bounded by the query timeout
    async fn blocking<T, F>(&self, f: F) -> Result<T, McpError>
    where
        T: Send + 'static,
        F: FnOnce(&NetworkInspector) -> T + Send + 'static,
    {
        let inspector = self.inspector.clone();
        let task = tokio::task::spawn_blocking(move || f(&inspector));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(McpError::internal_error(
                format!("Network query task failed: {}", e),
                None,
            )),
            Err(_) => {
                tracing::warn!("Network query exceeded {:?}", self.timeout);
                Err(McpError::internal_error(
                    format!("Network query timed out after {}ms", self.timeout.as_millis()),
                    None,
                ))
            }
        }
    }

    pub fn server_name(&self) -> &str {
        "netconfig"
    }

    pub fn server_description(&self) -> &str {
        SERVER_DESCRIPTION
    }

    /// All tools with their schemas
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Call a tool in-process, without an MCP transport
    pub async fn call_tool(&self, name: &str, _params: Value) -> ToolCallResult<CallToolResult> {
        match name {
            "get_network_config" => self.get_network_config().await.map_err(Into::into),
            "get_network_snapshot" => self.get_network_snapshot().await.map_err(Into::into),
            "get_host_capabilities" => self.get_host_capabilities().await.map_err(Into::into),
            _ => Err(ToolCallError::ToolNotFound(name.to_string())),
        }
    }
}

/// Pretty-printed JSON tool response
fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for NetconfigMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_DESCRIPTION.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

impl Default for NetconfigMcpServer {
    fn default() -> Self {
        Self::new()
    }
}
