//! Weather tool backed by a static city table.

use crate::error::ToolError;
use crate::types::{parse_args, ParameterSpec, Tool, ToolDefinition};
use async_trait::async_trait;
use serde::Deserialize;

/// Value reported for cities missing from the table.
pub const UNKNOWN_READING: &str = "N/A";

const READINGS: &[(&str, i32, &str)] = &[
    ("New York", 22, "Sunny"),
    ("London", 18, "Rainy"),
    ("Tokyo", 26, "Cloudy"),
    ("Sydney", 20, "Clear"),
];

/// Mock weather lookup.
pub struct WeatherTool;

#[derive(Deserialize)]
struct WeatherArgs {
    location: String,
}

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }

    /// Temperature (°C) and condition for a city, exact match.
    pub fn lookup(location: &str) -> Option<(i32, &'static str)> {
        READINGS
            .iter()
            .find(|(city, _, _)| *city == location)
            .map(|(_, temp, condition)| (*temp, *condition))
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "getWeatherInfo",
            "Get weather information for a location",
            &[ParameterSpec::string("location", "The name of the city")],
        )
    }

    fn name(&self) -> &str {
        "getWeatherInfo"
    }

    fn route(&self) -> &str {
        "weather"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: WeatherArgs = parse_args(arguments)?;
        let location = args.location.trim();

        let (temp, condition) = match Self::lookup(location) {
            Some((temp, condition)) => (temp.to_string(), condition),
            None => (UNKNOWN_READING.to_string(), UNKNOWN_READING),
        };

        Ok(format!(
            "{}: Temperature: {}°C, Condition: {}",
            location, temp, condition
        ))
    }
}
