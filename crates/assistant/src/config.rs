//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tools::Toolset;

/// Application configuration.
///
/// Every section has defaults, so the assistant starts with an empty
/// environment; requests that need a missing key fail per query instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Chat completion endpoint and the three model roles
    #[serde(default)]
    pub llm: LlmConfig,

    /// Routing agent behaviour
    #[serde(default)]
    pub agent: AgentConfig,

    /// Slide deck content generation and export
    #[serde(default)]
    pub deck: DeckConfig,

    /// Image back end credentials
    #[serde(default)]
    pub images: ImagesConfig,

    /// Local persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// API key for the OpenAI-compatible endpoint
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// API base URL
    #[serde(default = "default_llm_url")]
    pub base_url: String,

    /// Model answering `TOOL: NAME` / `NO TOOL`
    #[serde(default = "default_routing_model")]
    pub routing_model: String,

    /// Model given the tool schema
    #[serde(default = "default_tool_model")]
    pub tool_model: String,

    /// Model for queries that need no tool
    #[serde(default = "default_general_model")]
    pub general_model: String,

    /// Request timeout
    #[serde(default = "default_llm_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Which built-in tool bundle to register
    #[serde(default)]
    pub toolset: Toolset,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-call tool execution limit
    #[serde(default = "default_tool_timeout", with = "humantime_serde")]
    pub tool_timeout: Duration,

    /// Tool output is truncated to this many characters
    #[serde(default = "default_max_tool_output")]
    pub max_tool_output: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeckConfig {
    /// Gemini API key
    #[serde(default)]
    pub gemini_api_key: Option<SecretString>,

    #[serde(default = "default_gemini_url")]
    pub gemini_base_url: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Timeout for content and image requests
    #[serde(default = "default_deck_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Slide images requested at once
    #[serde(default = "default_image_concurrency")]
    pub image_concurrency: usize,

    /// Directory `.pptx` files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    #[serde(default)]
    pub fal_api_key: Option<SecretString>,

    #[serde(default)]
    pub together_api_key: Option<SecretString>,

    #[serde(default)]
    pub unsplash_access_key: Option<SecretString>,

    /// Google Cloud project hosting Imagen
    #[serde(default)]
    pub google_project_id: Option<String>,

    /// OAuth access token for the Imagen predict endpoint
    #[serde(default)]
    pub google_access_token: Option<SecretString>,

    #[serde(default = "default_fal_url")]
    pub fal_base_url: String,

    #[serde(default = "default_imagen_url")]
    pub imagen_base_url: String,

    #[serde(default = "default_together_url")]
    pub together_base_url: String,

    #[serde(default = "default_unsplash_url")]
    pub unsplash_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value store files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

// Default implementations
impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_url(),
            routing_model: default_routing_model(),
            tool_model: default_tool_model(),
            general_model: default_general_model(),
            timeout: default_llm_timeout(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            toolset: Toolset::default(),
            log_level: default_log_level(),
            tool_timeout: default_tool_timeout(),
            max_tool_output: default_max_tool_output(),
        }
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_base_url: default_gemini_url(),
            gemini_model: default_gemini_model(),
            timeout: default_deck_timeout(),
            image_concurrency: default_image_concurrency(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            fal_api_key: None,
            together_api_key: None,
            unsplash_access_key: None,
            google_project_id: None,
            google_access_token: None,
            fal_base_url: default_fal_url(),
            imagen_base_url: default_imagen_url(),
            together_base_url: default_together_url(),
            unsplash_base_url: default_unsplash_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

// Default value functions
fn default_llm_url() -> String {
    "https://api.groq.com/openai/v1".into()
}

fn default_routing_model() -> String {
    "llama3-70b-8192".into()
}

fn default_tool_model() -> String {
    "llama-3.3-70b-versatile".into()
}

fn default_general_model() -> String {
    "llama3-70b-8192".into()
}

fn default_llm_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_log_level() -> String {
    "info".into()
}

fn default_tool_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_tool_output() -> usize {
    4000
}

fn default_gemini_url() -> String {
    slide_deck::content::DEFAULT_GEMINI_BASE_URL.into()
}

fn default_gemini_model() -> String {
    slide_deck::content::DEFAULT_GEMINI_MODEL.into()
}

fn default_deck_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_image_concurrency() -> usize {
    slide_deck::generator::DEFAULT_IMAGE_CONCURRENCY
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_fal_url() -> String {
    slide_deck::images::DEFAULT_FAL_BASE_URL.into()
}

fn default_imagen_url() -> String {
    slide_deck::images::DEFAULT_IMAGEN_BASE_URL.into()
}

fn default_together_url() -> String {
    slide_deck::images::DEFAULT_TOGETHER_BASE_URL.into()
}

fn default_unsplash_url() -> String {
    slide_deck::images::DEFAULT_UNSPLASH_BASE_URL.into()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Keys and tokens stay strings even when they look numeric.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config> {
        let mut builder = config::Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value)?;
        }
        Ok(builder.build()?.try_deserialize()?)
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = from_pairs(&[]).unwrap();

        assert!(config.llm.api_key.is_none());
        assert_eq!(config.llm.routing_model, "llama3-70b-8192");
        assert_eq!(config.llm.tool_model, "llama-3.3-70b-versatile");
        assert_eq!(config.agent.toolset, Toolset::Basic);
        assert_eq!(config.agent.tool_timeout, Duration::from_secs(10));
        assert_eq!(config.deck.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("llm.api_key", "sk-test"),
            ("llm.timeout", "5s"),
            ("agent.toolset", "developer"),
            ("agent.max_tool_output", "100"),
            ("deck.image_concurrency", "2"),
            ("images.unsplash_access_key", "u-key"),
        ])
        .unwrap();

        assert_eq!(
            config.llm.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("sk-test")
        );
        assert_eq!(config.llm.timeout, Duration::from_secs(5));
        assert_eq!(config.agent.toolset, Toolset::Developer);
        assert_eq!(config.agent.max_tool_output, 100);
        assert_eq!(config.deck.image_concurrency, 2);
        assert!(config.images.unsplash_access_key.is_some());
        assert!(config.images.fal_api_key.is_none());
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let config = from_pairs(&[("llm.api_key", "sk-very-secret")]).unwrap();
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }
}
