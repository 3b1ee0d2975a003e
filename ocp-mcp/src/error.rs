//! Error types for the OCP MCP server

use thiserror::Error;

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// JSON-RPC: invalid JSON
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC: not a valid request object
pub const INVALID_REQUEST: i32 = -32600;
/// JSON-RPC: unknown method
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC: bad method parameters
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC: server-side failure
pub const INTERNAL_ERROR: i32 = -32603;

/// Errors that can occur in the MCP server
#[derive(Error, Debug)]
pub enum McpError {
    /// Unknown JSON-RPC method
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Request params are missing or malformed
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unknown tool name
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    /// Resource URI does not match any known resource
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Unknown prompt name
    #[error("Unknown prompt: {0}")]
    PromptNotFound(String),

    /// OCP Core error
    #[error("OCP Core error: {0}")]
    Core(#[from] ocp_core::OcpError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Not a JSON-RPC 2.0 request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl McpError {
    /// Create an MCP-formatted error object
    pub fn to_mcp_error(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string()
        })
    }

    /// Get error code for MCP protocol
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_)
            | McpError::ToolNotFound(_)
            | McpError::ResourceNotFound(_)
            | McpError::PromptNotFound(_) => INVALID_PARAMS,
            McpError::Core(_)
            | McpError::Io(_)
            | McpError::Serialization(_) => INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(McpError::MethodNotFound("x".into()).error_code(), -32601);
        assert_eq!(McpError::ToolNotFound("x".into()).error_code(), -32602);
        assert_eq!(McpError::InvalidRequest("x".into()).error_code(), -32600);
        assert_eq!(McpError::Io(std::io::Error::other("x")).error_code(), -32603);
    }

    #[test]
    fn test_to_mcp_error() {
        let value = McpError::ResourceNotFound("cluster://nope".into()).to_mcp_error();
        assert_eq!(value["code"], -32602);
        assert_eq!(value["message"], "Resource not found: cluster://nope");
    }
}
