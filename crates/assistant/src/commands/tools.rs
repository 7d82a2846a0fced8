//! Tools command - lists routable tools.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tools::ToolRegistry;

pub struct ToolsHandler {
    registry: Arc<ToolRegistry>,
}

impl ToolsHandler {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl CommandHandler for ToolsHandler {
    fn name(&self) -> &str {
        "tools"
    }

    fn trigger(&self) -> Option<&str> {
        Some("!tools")
    }

    async fn execute(&self, _input: &str) -> AppResult<String> {
        let lines: Vec<String> = self
            .registry
            .enabled_tools()
            .map(|tool| {
                let definition = tool.definition();
                format!(
                    "{} ({}) - {}",
                    tool.route(),
                    definition.function.name,
                    definition.function.description
                )
            })
            .collect();

        if lines.is_empty() {
            return Ok("No tools registered.".into());
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tools::Toolset;

    #[tokio::test]
    async fn test_lists_routes_and_function_names() {
        let handler = ToolsHandler::new(Arc::new(Toolset::Basic.registry()));
        let out = handler.execute("!tools").await.unwrap();

        assert!(out.starts_with("calculate (calculate) - "));
        assert!(out.contains("weather (getWeatherInfo) - "));
        assert_eq!(out.lines().count(), 4);
    }
}
