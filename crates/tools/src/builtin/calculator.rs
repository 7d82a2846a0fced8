//! Calculator tool backed by the constrained arithmetic parser.

use crate::error::ToolError;
use crate::expr;
use crate::types::{parse_args, ParameterSpec, Tool, ToolDefinition};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Calculator tool for evaluating arithmetic expressions.
pub struct CalculatorTool;

#[derive(Deserialize)]
struct CalculatorArgs {
    expression: String,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a result as a JSON number, integral values without a fraction.
fn result_value(result: f64) -> serde_json::Value {
    if result.fract() == 0.0 && result.abs() < 1e15 {
        serde_json::json!(result as i64)
    } else {
        serde_json::json!(result)
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "calculate",
            "Evaluate a mathematical expression. \
             Supports numbers, +, -, *, /, % (remainder), ^ (power) and parentheses.",
            &[ParameterSpec::string(
                "expression",
                "The mathematical expression to evaluate",
            )],
        )
    }

    fn name(&self) -> &str {
        "calculate"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: CalculatorArgs = parse_args(arguments)?;
        let expression = args.expression.trim();

        let result = expr::evaluate(expression).map_err(|e| {
            warn!(expression = %expression, error = %e, "Rejected expression");
            ToolError::from(e)
        })?;
        debug!(expression = %expression, result, "Evaluated expression");

        Ok(serde_json::json!({ "result": result_value(result) }).to_string())
    }
}
