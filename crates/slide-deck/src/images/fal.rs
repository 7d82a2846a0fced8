//! fal.ai FLUX schnell through the fal queue API.

use super::{check_status, require_key, ImageBackend};
use crate::error::ImageError;
use crate::types::ImageModel;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_FAL_BASE_URL: &str = "https://queue.fal.run";
const FAL_APP: &str = "fal-ai/flux/schnell";
const NAME: &str = "fal.ai";

#[derive(Serialize)]
struct SubmitRequest<'a> {
    prompt: String,
    image_size: &'a str,
}

#[derive(Deserialize)]
struct SubmitResponse {
    request_id: String,
    #[serde(default)]
    status_url: Option<String>,
    #[serde(default)]
    response_url: Option<String>,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Deserialize)]
struct ResultResponse {
    #[serde(default)]
    images: Vec<FalImage>,
}

#[derive(Deserialize)]
struct FalImage {
    url: String,
}

/// Submit, poll until completed, then fetch the result.
#[derive(Clone)]
pub struct FalFlux {
    client: Client,
    base_url: String,
    api_key: SecretString,
    poll_interval: Duration,
    max_polls: u32,
}

impl FalFlux {
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let api_key = api_key.into();
        require_key(&api_key, "fal.ai API key")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key),
            poll_interval: Duration::from_millis(500),
            max_polls: 120,
        })
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    fn auth(&self) -> String {
        format!("Key {}", self.api_key.expose_secret())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ImageError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", self.auth())
            .send()
            .await?;
        Ok(check_status(NAME, response).await?.json().await?)
    }
}

#[async_trait]
impl ImageBackend for FalFlux {
    fn model(&self) -> ImageModel {
        ImageModel::FalFlux
    }

    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let request = SubmitRequest {
            prompt: format!("Professional presentation image: {}", prompt),
            image_size: "square_hd",
        };

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, FAL_APP))
            .header("Authorization", self.auth())
            .json(&request)
            .send()
            .await?;
        let submitted: SubmitResponse = check_status(NAME, response).await?.json().await?;

        let request_url = format!(
            "{}/{}/requests/{}",
            self.base_url, FAL_APP, submitted.request_id
        );
        let status_url = submitted
            .status_url
            .unwrap_or_else(|| format!("{}/status", request_url));
        let response_url = submitted.response_url.unwrap_or(request_url);

        let mut completed = false;
        for _ in 0..self.max_polls {
            let status: StatusResponse = self.get_json(&status_url).await?;
            debug!(request_id = %submitted.request_id, status = %status.status, "fal queue status");
            match status.status.as_str() {
                "COMPLETED" => {
                    completed = true;
                    break;
                }
                "IN_QUEUE" | "IN_PROGRESS" => tokio::time::sleep(self.poll_interval).await,
                _ => return Err(ImageError::Incomplete(NAME)),
            }
        }
        if !completed {
            return Err(ImageError::Incomplete(NAME));
        }

        let result: ResultResponse = self.get_json(&response_url).await?;
        result
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or(ImageError::NoImage(NAME))
    }
}
