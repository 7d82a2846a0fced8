//! Translation tool backed by a static phrase table.

use crate::error::ToolError;
use crate::types::{parse_args, ParameterSpec, Tool, ToolDefinition};
use async_trait::async_trait;
use serde::Deserialize;

pub const TRANSLATION_UNAVAILABLE: &str = "Translation not available";

const PHRASES: &[(&str, &[(&str, &str)])] = &[
    ("Hello", &[("es", "Hola"), ("fr", "Bonjour"), ("de", "Hallo")]),
    (
        "Goodbye",
        &[("es", "Adiós"), ("fr", "Au revoir"), ("de", "Auf Wiedersehen")],
    ),
];

/// Mock phrase translation.
pub struct TranslateTool;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateArgs {
    text: String,
    target_language: String,
}

impl TranslateTool {
    pub fn new() -> Self {
        Self
    }

    pub fn lookup(text: &str, target_language: &str) -> Option<&'static str> {
        PHRASES
            .iter()
            .find(|(phrase, _)| *phrase == text)
            .and_then(|(_, targets)| targets.iter().find(|(lang, _)| *lang == target_language))
            .map(|(_, translated)| *translated)
    }
}

impl Default for TranslateTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TranslateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "translateText",
            "Translate text to another language",
            &[
                ParameterSpec::string("text", "The text to translate"),
                ParameterSpec::string(
                    "targetLanguage",
                    "The target language code (e.g., es, fr, de)",
                ),
            ],
        )
    }

    fn name(&self) -> &str {
        "translateText"
    }

    fn route(&self) -> &str {
        "translate"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: TranslateArgs = parse_args(arguments)?;
        Ok(Self::lookup(args.text.trim(), args.target_language.trim())
            .unwrap_or(TRANSLATION_UNAVAILABLE)
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_phrase() {
        let tool = TranslateTool::new();
        let result = tool
            .execute(r#"{"text": "Goodbye", "targetLanguage": "de"}"#)
            .await
            .unwrap();
        assert_eq!(result, "Auf Wiedersehen");
    }

    #[tokio::test]
    async fn test_arguments_bind_by_name_not_position() {
        let tool = TranslateTool::new();
        let result = tool
            .execute(r#"{"targetLanguage": "fr", "text": "Hello"}"#)
            .await
            .unwrap();
        assert_eq!(result, "Bonjour");
    }

    #[tokio::test]
    async fn test_unknown_phrase_or_language() {
        let tool = TranslateTool::new();
        let result = tool
            .execute(r#"{"text": "Thanks", "targetLanguage": "es"}"#)
            .await
            .unwrap();
        assert_eq!(result, TRANSLATION_UNAVAILABLE);

        assert_eq!(TranslateTool::lookup("Hello", "it"), None);
    }
}
