//! Presentation data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest and largest deck a config may request.
pub const MIN_SLIDES: usize = 1;
pub const MAX_SLIDES: usize = 50;

/// Slide count used when a request does not name one.
pub const DEFAULT_SLIDE_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    #[default]
    Business,
    Educational,
    Informative,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Educational => "educational",
            Self::Informative => "informative",
        }
    }
}

impl FromStr for Purpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" => Ok(Self::Business),
            "educational" => Ok(Self::Educational),
            "informative" => Ok(Self::Informative),
            other => Err(format!("unknown purpose '{}'", other)),
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLength {
    Brief,
    #[default]
    Medium,
    Detailed,
}

impl FromStr for ContentLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(Self::Brief),
            "medium" => Ok(Self::Medium),
            "detailed" => Ok(Self::Detailed),
            other => Err(format!("unknown content length '{}'", other)),
        }
    }
}

/// Image back end selected for a deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageModel {
    #[default]
    #[serde(rename = "imagen-3-fast")]
    Imagen3Fast,
    #[serde(rename = "imagen-3")]
    Imagen3,
    #[serde(rename = "together-sdxl")]
    TogetherSdxl,
    #[serde(rename = "unsplash")]
    Unsplash,
    #[serde(rename = "fal-flux")]
    FalFlux,
}

impl ImageModel {
    pub const ALL: [ImageModel; 5] = [
        Self::Imagen3Fast,
        Self::Imagen3,
        Self::TogetherSdxl,
        Self::Unsplash,
        Self::FalFlux,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imagen3Fast => "imagen-3-fast",
            Self::Imagen3 => "imagen-3",
            Self::TogetherSdxl => "together-sdxl",
            Self::Unsplash => "unsplash",
            Self::FalFlux => "fal-flux",
        }
    }
}

impl FromStr for ImageModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown image model '{}'", s))
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex colours used when a deck is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    BeeHappy,
    Ash,
    Oasis,
    Tranquil,
    Kraft,
    #[default]
    Verdigris,
    Midnight,
    Aurora,
    Nature,
}

impl Theme {
    pub const ALL: [Theme; 9] = [
        Self::BeeHappy,
        Self::Ash,
        Self::Oasis,
        Self::Tranquil,
        Self::Kraft,
        Self::Verdigris,
        Self::Midnight,
        Self::Aurora,
        Self::Nature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeeHappy => "bee-happy",
            Self::Ash => "ash",
            Self::Oasis => "oasis",
            Self::Tranquil => "tranquil",
            Self::Kraft => "kraft",
            Self::Verdigris => "verdigris",
            Self::Midnight => "midnight",
            Self::Aurora => "aurora",
            Self::Nature => "nature",
        }
    }

    pub fn colors(&self) -> ThemeColors {
        let (background, accent, text) = match self {
            Self::BeeHappy => ("FFD700", "1F2937", "1F2937"),
            Self::Ash => ("F3F4F6", "1F2937", "1F2937"),
            Self::Oasis => ("059669", "F0FDF4", "FFFFFF"),
            Self::Tranquil => ("3B82F6", "EFF6FF", "FFFFFF"),
            Self::Kraft => ("FDE68A", "92400E", "78350F"),
            Self::Verdigris => ("14B8A6", "F0FDFA", "FFFFFF"),
            Self::Midnight => ("0F172A", "E2E8F0", "FFFFFF"),
            Self::Aurora => ("A855F7", "FAE8FF", "FFFFFF"),
            Self::Nature => ("22C55E", "F0FDF4", "FFFFFF"),
        };
        ThemeColors {
            background,
            accent,
            text,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown theme '{}'", s))
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationConfig {
    pub topic: String,
    #[serde(default)]
    pub purpose: Purpose,
    #[serde(default)]
    pub audience: String,
    pub slide_count: usize,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub style: Theme,
    #[serde(default)]
    pub content_length: ContentLength,
    #[serde(default)]
    pub image_source: ImageModel,
}

impl PresentationConfig {
    pub fn new(topic: impl Into<String>, slide_count: usize) -> Self {
        Self {
            topic: topic.into(),
            purpose: Purpose::default(),
            audience: String::new(),
            slide_count,
            key_points: Vec::new(),
            style: Theme::default(),
            content_length: ContentLength::default(),
            image_source: ImageModel::default(),
        }
    }

    /// Reject configs that cannot produce a deck.
    pub fn validate(&self) -> Result<(), String> {
        if self.topic.trim().is_empty() {
            return Err("topic is required".into());
        }
        if !(MIN_SLIDES..=MAX_SLIDES).contains(&self.slide_count) {
            return Err(format!(
                "slide count must be between {} and {}",
                MIN_SLIDES, MAX_SLIDES
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl Slide {
    /// Sources, treating an absent list as empty.
    pub fn sources(&self) -> &[String] {
        self.sources.as_deref().unwrap_or_default()
    }
}

/// A generated deck: ordered slides plus metadata and references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub id: String,
    pub config: PresentationConfig,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub references: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to one slide. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub image_prompt: Option<String>,
    pub sources: Option<Vec<String>>,
}

impl SlideEdit {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, slide: &mut Slide) {
        if let Some(title) = &self.title {
            slide.title = title.clone();
        }
        if let Some(content) = &self.content {
            slide.content = content.clone();
        }
        if let Some(notes) = &self.notes {
            slide.notes = Some(notes.clone());
        }
        if let Some(url) = &self.image_url {
            slide.image_url = Some(url.clone()).filter(|u| !u.is_empty());
        }
        if let Some(prompt) = &self.image_prompt {
            slide.image_prompt = Some(prompt.clone());
        }
        if let Some(sources) = &self.sources {
            slide.sources = Some(sources.clone());
        }
    }
}

/// One slide as returned by the content model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSlide {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_prompt: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

/// The JSON document the content model is asked to produce.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedContent {
    pub slides: Vec<GeneratedSlide>,
    #[serde(default)]
    pub references: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_theme_names_roundtrip() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), theme);
            let json = serde_json::to_string(&theme).unwrap();
            assert_eq!(json, format!("\"{}\"", theme.as_str()));
        }
        assert!("plaid".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_colors() {
        let colors = Theme::BeeHappy.colors();
        assert_eq!(colors.background, "FFD700");
        assert_eq!(colors.text, "1F2937");
        assert_eq!(Theme::Midnight.colors().background, "0F172A");
    }

    #[test]
    fn test_image_model_serde_names() {
        assert_eq!(
            serde_json::to_string(&ImageModel::Imagen3Fast).unwrap(),
            "\"imagen-3-fast\""
        );
        assert_eq!("FAL-FLUX".parse::<ImageModel>().unwrap(), ImageModel::FalFlux);
        assert!("dall-e".parse::<ImageModel>().is_err());
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: PresentationConfig =
            serde_json::from_str(r#"{"topic": "Rust", "slideCount": 3}"#).unwrap();
        assert_eq!(config.style, Theme::Verdigris);
        assert_eq!(config.purpose, Purpose::Business);
        assert_eq!(config.image_source, ImageModel::Imagen3Fast);
        assert_ok!(config.validate());
    }

    #[test]
    fn test_config_validation() {
        assert_err!(PresentationConfig::new("  ", 3).validate());
        assert_err!(PresentationConfig::new("Rust", 0).validate());
        assert_err!(PresentationConfig::new("Rust", 51).validate());
        assert_ok!(PresentationConfig::new("Rust", 50).validate());
    }

    #[test]
    fn test_slide_edit_applies_only_given_fields() {
        let mut slide = Slide {
            id: "slide-0".into(),
            title: "Old".into(),
            content: "Body".into(),
            image_url: Some("https://img".into()),
            notes: None,
            sources: None,
            image_prompt: None,
            generated_at: None,
        };

        let edit = SlideEdit {
            title: Some("New".into()),
            image_url: Some(String::new()),
            ..Default::default()
        };
        edit.apply(&mut slide);

        assert_eq!(slide.title, "New");
        assert_eq!(slide.content, "Body");
        assert!(slide.image_url.is_none());
        assert!(SlideEdit::default().is_empty());
    }

    #[test]
    fn test_generated_content_accepts_missing_optionals() {
        let json = r#"{"slides": [{"title": "T", "content": "C"}]}"#;
        let content: GeneratedContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.slides.len(), 1);
        assert!(content.references.is_empty());
        assert!(content.slides[0].image_prompt.is_none());
    }
}
