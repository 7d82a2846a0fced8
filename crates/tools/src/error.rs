//! Tool execution errors.

use crate::expr::ExprError;
use thiserror::Error;

/// Errors that can occur during tool execution.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool execution timed out.
    #[error("Tool execution timed out after {0} seconds")]
    Timeout(u64),

    /// Invalid arguments provided to tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arithmetic expression could not be evaluated.
    #[error("Invalid expression")]
    Expression(#[from] ExprError),
}
