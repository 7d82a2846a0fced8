//! Unit conversion tool backed by a static conversion table.

use crate::error::ToolError;
use crate::types::{parse_args, ParameterSpec, Tool, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

pub const CONVERSION_UNSUPPORTED: &str = "Conversion not supported";

/// How a unit pair converts.
#[derive(Clone, Copy)]
enum Conversion {
    Factor(f64),
    Formula(fn(f64) -> f64),
}

impl Conversion {
    fn apply(self, value: f64) -> f64 {
        match self {
            Conversion::Factor(factor) => value * factor,
            Conversion::Formula(f) => f(value),
        }
    }
}

fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

const CONVERSIONS: &[(&str, &str, Conversion)] = &[
    ("km", "miles", Conversion::Factor(0.621371)),
    ("km", "meters", Conversion::Factor(1000.0)),
    ("kg", "lbs", Conversion::Factor(2.20462)),
    ("kg", "g", Conversion::Factor(1000.0)),
    ("celsius", "fahrenheit", Conversion::Formula(celsius_to_fahrenheit)),
];

/// Mock unit conversion.
pub struct ConvertTool;

#[derive(Deserialize)]
struct ConvertArgs {
    #[serde(deserialize_with = "number_or_string")]
    value: f64,
    from: String,
    to: String,
}

/// Models occasionally send numbers as strings.
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl ConvertTool {
    pub fn new() -> Self {
        Self
    }

    /// Convert `value` between two units from the table.
    pub fn convert(value: f64, from: &str, to: &str) -> Option<f64> {
        CONVERSIONS
            .iter()
            .find(|(f, t, _)| *f == from && *t == to)
            .map(|(_, _, conversion)| conversion.apply(value))
    }
}

impl Default for ConvertTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ConvertTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "convertUnits",
            "Convert between different units",
            &[
                ParameterSpec::number("value", "The value to convert"),
                ParameterSpec::string("from", "The source unit"),
                ParameterSpec::string("to", "The target unit"),
            ],
        )
    }

    fn name(&self) -> &str {
        "convertUnits"
    }

    fn route(&self) -> &str {
        "convert"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: ConvertArgs = parse_args(arguments)?;

        Ok(
            match Self::convert(args.value, args.from.trim(), args.to.trim()) {
                Some(result) => serde_json::json!(result).to_string(),
                None => CONVERSION_UNSUPPORTED.to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_conversions() {
        assert_eq!(ConvertTool::convert(10.0, "km", "meters"), Some(10000.0));
        assert_eq!(ConvertTool::convert(2.0, "kg", "g"), Some(2000.0));
        assert_eq!(ConvertTool::convert(1.0, "km", "miles"), Some(0.621371));
        assert_eq!(ConvertTool::convert(1.0, "kg", "lbs"), Some(2.20462));
    }

    #[test]
    fn test_formula_conversion() {
        assert_eq!(ConvertTool::convert(100.0, "celsius", "fahrenheit"), Some(212.0));
        assert_eq!(ConvertTool::convert(0.0, "celsius", "fahrenheit"), Some(32.0));
    }

    #[test]
    fn test_unsupported_pair() {
        assert_eq!(ConvertTool::convert(1.0, "miles", "km"), None);
        assert_eq!(ConvertTool::convert(1.0, "fahrenheit", "celsius"), None);
    }

    #[tokio::test]
    async fn test_execute() {
        let tool = ConvertTool::new();

        let result = tool
            .execute(r#"{"value": 5, "from": "kg", "to": "g"}"#)
            .await
            .unwrap();
        assert_eq!(result, "5000.0");

        let result = tool
            .execute(r#"{"value": "3", "from": "km", "to": "meters"}"#)
            .await
            .unwrap();
        assert_eq!(result, "3000.0");

        let result = tool
            .execute(r#"{"value": 1, "from": "lbs", "to": "kg"}"#)
            .await
            .unwrap();
        assert_eq!(result, CONVERSION_UNSUPPORTED);
    }

    #[tokio::test]
    async fn test_non_numeric_value_rejected() {
        let tool = ConvertTool::new();
        let result = tool
            .execute(r#"{"value": "lots", "from": "kg", "to": "g"}"#)
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
