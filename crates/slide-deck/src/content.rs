//! Slide content generation through the Gemini `generateContent` API.

use crate::error::DeckError;
use crate::types::{GeneratedContent, PresentationConfig};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Produces the text of a deck.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate exactly `config.slide_count` slides plus references.
    async fn generate(&self, config: &PresentationConfig) -> Result<GeneratedContent, DeckError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_k: 1,
            top_p: 1.0,
            max_output_tokens: 4096,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DeckError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DeckError::MissingApiKey);
        }

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a prompt and return the concatenated text of the first candidate.
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    pub async fn generate_text(&self, prompt: &str) -> Result<String, DeckError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig::default(),
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            error!(status = status.as_u16(), "Gemini request failed");
            return Err(DeckError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(DeckError::EmptyResponse);
        }
        debug!(len = text.len(), "Received generated text");
        Ok(text)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, config: &PresentationConfig) -> Result<GeneratedContent, DeckError> {
        let prompt = build_prompt(config);
        let text = self.generate_text(&prompt).await?;
        let content = parse_content(&text, config.slide_count)?;
        info!(
            slides = content.slides.len(),
            references = content.references.len(),
            "Generated presentation content"
        );
        Ok(content)
    }
}

/// Prompt asking for the deck as a strict JSON document.
pub fn build_prompt(config: &PresentationConfig) -> String {
    let count = config.slide_count;
    let audience = &config.audience;
    format!(
        r#"Create a well-researched presentation with exactly {count} slides on:
Topic: {topic}
Purpose: {purpose}
Audience: {audience}
Key Points: {key_points}

IMPORTANT: The presentation MUST have exactly {count} slides, including the title slide.
Respond ONLY with a valid JSON object containing comprehensive research and citations.
The response must be a JSON object with this exact schema:
{{
  "slides": [
    {{
      "title": string,
      "content": string,
      "notes": string (include research findings and talking points),
      "imagePrompt": string,
      "sources": string[] (list of relevant sources)
    }}
  ],
  "references": string[] (complete list of all sources used)
}}

Requirements:
1. Content:
  - First slide is a compelling title slide
  - Each key point gets its own detailed slide
  - Content is concise yet informative
  - Use professional language for {audience}

2. Research:
  - Include relevant statistics and data
  - Cite reputable sources (academic papers, industry reports, etc.)
  - Add context and background in speaker notes

3. Speaker Notes:
  - Provide detailed talking points
  - Include relevant research findings
  - Add engagement tips and audience interaction points
  - Suggest answers to potential questions

4. Visual Elements:
  - Include descriptive imagePrompt for professional visuals
  - Suggest data visualization where appropriate

5. Sources:
  - Include source citations for each slide
  - Provide a complete reference list"#,
        topic = config.topic,
        purpose = config.purpose,
        key_points = config.key_points.join(", "),
    )
}

/// Remove markdown code fences wrapped around a JSON reply.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        s = rest.trim_start();
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    s
}

/// Parse the model reply and check it has the requested number of slides.
pub fn parse_content(text: &str, expected_slides: usize) -> Result<GeneratedContent, DeckError> {
    let cleaned = strip_code_fences(text);
    let content: GeneratedContent = serde_json::from_str(cleaned).map_err(|e| {
        error!(error = %e, "Invalid JSON response from content model");
        DeckError::InvalidContent(e)
    })?;

    if content.slides.len() != expected_slides {
        return Err(DeckError::SlideCount {
            expected: expected_slides,
            actual: content.slides.len(),
        });
    }
    Ok(content)
}
