//! Built-in tools and the toolsets that bundle them.

mod calculator;
mod convert;
mod developer;
mod text;
mod translate;
mod weather;

pub use calculator::CalculatorTool;
pub use convert::{ConvertTool, CONVERSION_UNSUPPORTED};
pub use developer::{CodeStubTool, StubSpec, DEVELOPER_TOOLS};
pub use text::{KeywordsTool, SentimentTool, SummarizeTool, SENTIMENTS};
pub use translate::{TranslateTool, TRANSLATION_UNAVAILABLE};
pub use weather::{WeatherTool, UNKNOWN_READING};

use crate::registry::ToolRegistry;
use serde::Deserialize;
use std::sync::Arc;

/// Named bundle of built-in tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolset {
    /// Calculator, weather, translation and unit conversion.
    #[default]
    Basic,
    /// Code assistance plus calculator and text tools.
    Developer,
}

impl Toolset {
    /// Build a registry holding this toolset.
    pub fn registry(self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        match self {
            Toolset::Basic => {
                registry.register(Arc::new(CalculatorTool::new()));
                registry.register(Arc::new(WeatherTool::new()));
                registry.register(Arc::new(TranslateTool::new()));
                registry.register(Arc::new(ConvertTool::new()));
            }
            Toolset::Developer => {
                for tool in CodeStubTool::all() {
                    registry.register(tool);
                }
                registry.register(Arc::new(CalculatorTool::new()));
                registry.register(Arc::new(SummarizeTool));
                registry.register(Arc::new(SentimentTool));
                registry.register(Arc::new(KeywordsTool));
                registry.register(Arc::new(TranslateTool::new()));
            }
        }
        registry
    }
}

impl std::str::FromStr for Toolset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Toolset::Basic),
            "developer" => Ok(Toolset::Developer),
            other => Err(format!("unknown toolset '{}'", other)),
        }
    }
}
