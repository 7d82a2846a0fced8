//! Text analysis tools: summary, sentiment and keyword extraction.

use crate::error::ToolError;
use crate::types::{parse_args, ParameterSpec, Tool, ToolDefinition};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;

pub const SENTIMENTS: [&str; 3] = ["positive", "negative", "neutral"];

const SUMMARY_CHARS: usize = 100;
const MAX_KEYWORDS: usize = 5;
const MIN_KEYWORD_LEN: usize = 5;

#[derive(Deserialize)]
struct TextArgs {
    text: String,
}

fn text_param(description: &'static str) -> [ParameterSpec; 1] {
    [ParameterSpec::string("text", description)]
}

/// Truncating summary of a text.
pub struct SummarizeTool;

#[async_trait]
impl Tool for SummarizeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "summarizeText",
            "Generate a concise summary of a text",
            &text_param("The text to summarize"),
        )
    }

    fn name(&self) -> &str {
        "summarizeText"
    }

    fn route(&self) -> &str {
        "summarize"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: TextArgs = parse_args(arguments)?;
        let head: String = args.text.chars().take(SUMMARY_CHARS).collect();
        Ok(format!("Here's a summary of the text: {}...", head))
    }
}

/// Sentiment label picked at random.
pub struct SentimentTool;

#[async_trait]
impl Tool for SentimentTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "analyzeSentiment",
            "Analyze the sentiment of a text",
            &text_param("The text to analyze"),
        )
    }

    fn name(&self) -> &str {
        "analyzeSentiment"
    }

    fn route(&self) -> &str {
        "sentiment"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let _args: TextArgs = parse_args(arguments)?;
        let label = SENTIMENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("neutral");
        Ok(label.to_string())
    }
}

/// First few long words of a text.
pub struct KeywordsTool;

impl KeywordsTool {
    pub fn extract(text: &str) -> String {
        text.split(' ')
            .filter(|word| word.chars().count() >= MIN_KEYWORD_LEN)
            .take(MAX_KEYWORDS)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl Tool for KeywordsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "extractKeywords",
            "Extract key words from a text",
            &text_param("The text to analyze"),
        )
    }

    fn name(&self) -> &str {
        "extractKeywords"
    }

    fn route(&self) -> &str {
        "keywords"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: TextArgs = parse_args(arguments)?;
        Ok(Self::extract(&args.text))
    }
}
