//! Tool executor with timeout and error handling.

use crate::registry::ToolRegistry;
use crate::types::{ToolCall, ToolResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Executor for running tools with safety limits.
///
/// Failures never escape: a missing tool, bad arguments, a tool error or
/// a timeout all come back as a [`ToolResult`] holding an error payload.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    timeout_secs: u64,
    max_response_len: usize,
}

impl ToolExecutor {
    /// Create a new executor.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout_secs: 10,
            max_response_len: 4000,
        }
    }

    /// Set execution timeout in seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum response length.
    pub fn with_max_response_len(mut self, len: usize) -> Self {
        self.max_response_len = len;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Execute a tool call.
    pub async fn execute(&self, tool_call: &ToolCall) -> ToolResult {
        let tool_name = &tool_call.function.name;
        info!(tool = %tool_name, "Executing tool");

        let tool = match self.registry.get_tool(tool_name) {
            Some(t) => t,
            None => {
                warn!(tool = %tool_name, "Tool not found or disabled");
                return ToolResult::error(
                    &tool_call.id,
                    format!("Tool '{}' not available", tool_name),
                );
            }
        };

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            tool.execute(&tool_call.function.arguments),
        )
        .await;

        match result {
            Ok(Ok(content)) => {
                let content = self.truncate(content);
                info!(tool = %tool_name, len = content.len(), "Tool executed successfully");
                ToolResult::success(&tool_call.id, content)
            }
            Ok(Err(e)) => {
                error!(tool = %tool_name, error = %e, "Tool execution failed");
                ToolResult::error(&tool_call.id, e.to_string())
            }
            Err(_) => {
                error!(tool = %tool_name, timeout = self.timeout_secs, "Tool timed out");
                ToolResult::error(
                    &tool_call.id,
                    format!("Tool timed out after {} seconds", self.timeout_secs),
                )
            }
        }
    }

    fn truncate(&self, content: String) -> String {
        match content.char_indices().nth(self.max_response_len) {
            Some((cut, _)) => format!(
                "{}... [truncated, {} chars total]",
                &content[..cut],
                content.chars().count()
            ),
            None => content,
        }
    }
}
