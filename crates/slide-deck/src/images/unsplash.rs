//! Unsplash stock-photo search.

use super::{check_status, require_key, ImageBackend};
use crate::error::ImageError;
use crate::types::ImageModel;
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

pub const DEFAULT_UNSPLASH_BASE_URL: &str = "https://api.unsplash.com";
const NAME: &str = "Unsplash";

/// Results are picked at random from this many top hits.
const TOP_RESULTS: usize = 5;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Clone)]
pub struct Unsplash {
    client: Client,
    base_url: String,
    access_key: SecretString,
}

impl Unsplash {
    pub fn new(
        client: Client,
        access_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let access_key = access_key.into();
        require_key(&access_key, "Unsplash access key")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: SecretString::new(access_key),
        })
    }

    async fn get(&self, url: String) -> Result<reqwest::Response, ImageError> {
        let response = self
            .client
            .get(url)
            .header(
                "Authorization",
                format!("Client-ID {}", self.access_key.expose_secret()),
            )
            .send()
            .await?;
        check_status(NAME, response).await
    }
}

fn pick_index(len: usize) -> usize {
    rand::thread_rng().gen_range(0..len.min(TOP_RESULTS))
}

#[async_trait]
impl ImageBackend for Unsplash {
    fn model(&self) -> ImageModel {
        ImageModel::Unsplash
    }

    /// Search by prompt and pick among the top hits; with no hits, take a
    /// random photo.
    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let search: SearchResponse = self
            .get(format!(
                "{}/search/photos?query={}&per_page=10",
                self.base_url,
                urlencoding::encode(prompt)
            ))
            .await?
            .json()
            .await?;

        if !search.results.is_empty() {
            let index = pick_index(search.results.len());
            debug!(index, hits = search.results.len(), "Picked search result");
            let mut results = search.results;
            return Ok(results.swap_remove(index).urls.regular);
        }

        let photo: Photo = self
            .get(format!("{}/photos/random", self.base_url))
            .await?
            .json()
            .await?;
        Ok(photo.urls.regular)
    }
}
