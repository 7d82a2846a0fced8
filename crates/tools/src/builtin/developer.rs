//! Code-assistance tools.
//!
//! These answer with a fixed acknowledgement; the follow-up model call
//! writes the actual code, explanation or audit from the user's query.

use crate::error::ToolError;
use crate::types::{ParameterSpec, Tool, ToolDefinition};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Static description of one code-assistance tool.
pub struct StubSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParameterSpec],
    /// Reply template; `{param}` placeholders are filled from the arguments.
    pub reply: &'static str,
}

pub const DEVELOPER_TOOLS: &[StubSpec] = &[
    StubSpec {
        name: "codeAssistant",
        description: "Generate code in a specified programming language with expert guidance",
        params: &[
            ParameterSpec::string("prompt", "The code requirements or description"),
            ParameterSpec::string("language", "The target programming language"),
        ],
        reply: "Generated {language} code for: {prompt}",
    },
    StubSpec {
        name: "debugCode",
        description: "Debug code and provide solutions for errors",
        params: &[
            ParameterSpec::string("code", "The code to debug"),
            ParameterSpec::string("error", "The error message or description"),
        ],
        reply: "Debug analysis and solution for the error",
    },
    StubSpec {
        name: "optimizeCode",
        description: "Optimize code for better performance",
        params: &[
            ParameterSpec::string("code", "The code to optimize"),
            ParameterSpec::string("target", "The optimization target (e.g., speed, memory)"),
        ],
        reply: "Optimized version of the code",
    },
    StubSpec {
        name: "generateTestCases",
        description: "Generate test cases for code",
        params: &[
            ParameterSpec::string("code", "The code to test"),
            ParameterSpec::string("language", "The programming language"),
        ],
        reply: "Generated test cases for the code",
    },
    StubSpec {
        name: "explainCode",
        description: "Explain code in detail",
        params: &[ParameterSpec::string("code", "The code to explain")],
        reply: "Detailed explanation of the code",
    },
    StubSpec {
        name: "refactorCode",
        description: "Refactor code for better structure",
        params: &[
            ParameterSpec::string("code", "The code to refactor"),
            ParameterSpec::string("goal", "The refactoring goal"),
        ],
        reply: "Refactored version of the code",
    },
    StubSpec {
        name: "securityAudit",
        description: "Perform security audit on code",
        params: &[ParameterSpec::string("code", "The code to audit")],
        reply: "Security audit results and recommendations",
    },
    StubSpec {
        name: "documentCode",
        description: "Generate documentation for code",
        params: &[
            ParameterSpec::string("code", "The code to document"),
            ParameterSpec::string("format", "Documentation format (e.g., JSDoc, docstring)"),
        ],
        reply: "Generated documentation for the code",
    },
    StubSpec {
        name: "convertCode",
        description: "Convert code between programming languages",
        params: &[
            ParameterSpec::string("code", "The code to convert"),
            ParameterSpec::string("fromLang", "Source programming language"),
            ParameterSpec::string("toLang", "Target programming language"),
        ],
        reply: "Converted code from {fromLang} to {toLang}",
    },
];

/// A code-assistance tool built from a [`StubSpec`].
pub struct CodeStubTool {
    spec: &'static StubSpec,
}

impl CodeStubTool {
    pub fn new(spec: &'static StubSpec) -> Self {
        Self { spec }
    }

    /// All code-assistance tools.
    pub fn all() -> Vec<Arc<dyn Tool>> {
        DEVELOPER_TOOLS
            .iter()
            .map(|spec| Arc::new(CodeStubTool::new(spec)) as Arc<dyn Tool>)
            .collect()
    }

    /// Fill `{param}` placeholders in one left-to-right pass, so argument
    /// values are never rescanned.
    fn render(&self, args: &Map<String, Value>) -> String {
        let mut reply = String::with_capacity(self.spec.reply.len());
        let mut rest = self.spec.reply;

        while let Some(start) = rest.find('{') {
            reply.push_str(&rest[..start]);
            let tail = &rest[start..];
            let name = tail
                .find('}')
                .map(|end| &tail[1..end])
                .filter(|name| self.spec.params.iter().any(|p| p.name == *name));

            match name {
                Some(name) => {
                    let value = args.get(name).and_then(Value::as_str).unwrap_or_default();
                    reply.push_str(value);
                    rest = &tail[name.len() + 2..];
                }
                None => {
                    reply.push('{');
                    rest = &tail[1..];
                }
            }
        }

        reply.push_str(rest);
        reply
    }
}

#[async_trait]
impl Tool for CodeStubTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(self.spec.name, self.spec.description, self.spec.params)
    }

    fn name(&self) -> &str {
        self.spec.name
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: Map<String, Value> = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        if let Some(missing) = self
            .spec
            .params
            .iter()
            .filter(|p| p.required)
            .find(|p| !args.get(p.name).is_some_and(Value::is_string))
        {
            return Err(ToolError::InvalidArguments(format!(
                "missing string field `{}`",
                missing.name
            )));
        }

        Ok(self.render(&args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(name: &str) -> CodeStubTool {
        let spec = DEVELOPER_TOOLS.iter().find(|s| s.name == name).unwrap();
        CodeStubTool::new(spec)
    }

    #[tokio::test]
    async fn test_reply_fills_placeholders() {
        let result = tool("codeAssistant")
            .execute(r#"{"prompt": "a linked list", "language": "Rust"}"#)
            .await
            .unwrap();
        assert_eq!(result, "Generated Rust code for: a linked list");

        let result = tool("convertCode")
            .execute(r#"{"code": "x = 1", "fromLang": "Python", "toLang": "Go"}"#)
            .await
            .unwrap();
        assert_eq!(result, "Converted code from Python to Go");
    }

    #[tokio::test]
    async fn test_argument_values_are_not_substituted_again() {
        let result = tool("codeAssistant")
            .execute(r#"{"prompt": "parse {language}", "language": "rust"}"#)
            .await
            .unwrap();
        assert_eq!(result, "Generated rust code for: parse {language}");
    }

    #[tokio::test]
    async fn test_fixed_reply() {
        let result = tool("securityAudit")
            .execute(r#"{"code": "eval(input)"}"#)
            .await
            .unwrap();
        assert_eq!(result, "Security audit results and recommendations");
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let result = tool("debugCode").execute(r#"{"code": "fn main() {}"}"#).await;
        assert!(
            matches!(result, Err(ToolError::InvalidArguments(msg)) if msg.contains("error"))
        );
    }

    #[test]
    fn test_all_tools_have_unique_names() {
        let tools = CodeStubTool::all();
        assert_eq!(tools.len(), 9);
        let mut names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 9);
    }
}
