//! Stable Diffusion XL through the Together images API.

use super::{check_status, require_key, to_data_url, ImageBackend};
use crate::error::ImageError;
use crate::types::ImageModel;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const DEFAULT_TOGETHER_BASE_URL: &str = "https://api.together.xyz";
const SDXL_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";
const NAME: &str = "Together";

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: String,
    width: u32,
    height: u32,
    steps: u32,
    n: u32,
    seed: u32,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    b64_json: Option<String>,
}

#[derive(Clone)]
pub struct TogetherSdxl {
    client: Client,
    base_url: String,
    api_key: SecretString,
    width: u32,
    height: u32,
    steps: u32,
}

impl TogetherSdxl {
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let api_key = api_key.into();
        require_key(&api_key, "Together API key")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key),
            width: 1024,
            height: 1024,
            steps: 40,
        })
    }
}

#[async_trait]
impl ImageBackend for TogetherSdxl {
    fn model(&self) -> ImageModel {
        ImageModel::TogetherSdxl
    }

    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let request = GenerationRequest {
            model: SDXL_MODEL,
            prompt: format!("Professional, high quality presentation image: {}", prompt),
            width: self.width,
            height: self.height,
            steps: self.steps,
            n: 1,
            seed: rand::random::<u32>() % 10_000,
            response_format: "b64_json",
        };

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let data: GenerationResponse = check_status(NAME, response).await?.json().await?;
        data.data
            .into_iter()
            .next()
            .and_then(|image| image.b64_json)
            .map(|b64| to_data_url("image/png", &b64))
            .ok_or(ImageError::NoImage(NAME))
    }
}
