//! Error handling for the network config MCP server

use netinspect::InspectError;
use rmcp::ErrorData as McpError;

/// Error type for in-process tool calls
#[derive(Debug, thiserror::Error)]
pub enum ToolCallError {
    /// Tool was not found in the server
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// MCP protocol error raised by the tool
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<McpError> for ToolCallError {
    fn from(err: McpError) -> Self {
        ToolCallError::McpError(err.message.to_string())
    }
}

/// Result type for in-process tool calls
pub type ToolCallResult<T> = Result<T, ToolCallError>;

/// Map an inspection failure to the rejection sent to MCP clients
pub fn query_failure(err: InspectError) -> McpError {
    McpError::internal_error(format!("Error getting network config: {}", err), None)
}
