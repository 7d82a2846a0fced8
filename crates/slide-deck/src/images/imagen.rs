//! Google Imagen 3 through the Vertex AI `predict` endpoint.

use super::{check_status, require_key, to_data_url, ImageBackend};
use crate::error::ImageError;
use crate::types::ImageModel;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, instrument};

pub const DEFAULT_IMAGEN_BASE_URL: &str = "https://us-central1-aiplatform.googleapis.com";
const LOCATION: &str = "us-central1";
const NAME: &str = "Imagen";

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

/// One Imagen quality tier.
#[derive(Clone)]
pub struct Imagen {
    client: Client,
    base_url: String,
    project_id: String,
    access_token: SecretString,
    model: ImageModel,
}

impl Imagen {
    /// `imagen-3.0-generate-002`.
    pub fn fast(
        client: Client,
        project_id: impl Into<String>,
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ImageError> {
        Self::new(ImageModel::Imagen3Fast, client, project_id, access_token, base_url)
    }

    /// `imagen-3.0-generate-001`.
    pub fn quality(
        client: Client,
        project_id: impl Into<String>,
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ImageError> {
        Self::new(ImageModel::Imagen3, client, project_id, access_token, base_url)
    }

    fn new(
        model: ImageModel,
        client: Client,
        project_id: impl Into<String>,
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let project_id = project_id.into();
        let access_token = access_token.into();
        require_key(&project_id, "Google project ID")?;
        require_key(&access_token, "Google access token")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id,
            access_token: SecretString::new(access_token),
            model,
        })
    }

    pub fn version(&self) -> &'static str {
        match self.model {
            ImageModel::Imagen3Fast => "imagen-3.0-generate-002",
            _ => "imagen-3.0-generate-001",
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            self.base_url,
            self.project_id,
            LOCATION,
            self.version()
        )
    }
}

#[async_trait]
impl ImageBackend for Imagen {
    fn model(&self) -> ImageModel {
        self.model
    }

    #[instrument(skip(self, prompt), fields(version = self.version()))]
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let body = json!({
            "instances": [{
                "prompt": format!(
                    "Professional presentation image: {}. High quality, clear, well-lit.",
                    prompt
                ),
                "sampleCount": 1,
                "negativePrompt": "blurry, low quality, distorted, watermark, text, writing",
                "seed": rand::random::<u32>() % 1_000_000,
            }],
            "parameters": {
                "sampleCount": 1,
                "steps": 30,
                "cfgScale": 7.5,
                "seed": rand::random::<u32>() % 1_000_000,
            }
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let data: PredictResponse = check_status(NAME, response).await?.json().await?;
        match data
            .predictions
            .into_iter()
            .next()
            .and_then(|p| p.bytes_base64_encoded)
        {
            Some(b64) => Ok(to_data_url("image/png", &b64)),
            None => {
                error!("Unexpected Imagen API response format");
                Err(ImageError::NoImage(NAME))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fast_tier_predict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(concat!(
                "/v1/projects/proj-1/locations/us-central1/publishers/google/models/",
                "imagen-3.0-generate-002:predict"
            )))
            .and(header("Authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "predictions": [{"bytesBase64Encoded": "iVBORw0KGgo=", "mimeType": "image/png"}]
            })))
            .mount(&server)
            .await;

        let imagen = Imagen::fast(Client::new(), "proj-1", "token-1", server.uri()).unwrap();
        let url = imagen.generate("mountains").await.unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_missing_prediction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"predictions": []})),
            )
            .mount(&server)
            .await;

        let imagen = Imagen::quality(Client::new(), "p", "t", server.uri()).unwrap();
        assert_eq!(imagen.version(), "imagen-3.0-generate-001");
        assert!(matches!(
            imagen.generate("x").await,
            Err(ImageError::NoImage(_))
        ));
    }

    #[test]
    fn test_requires_project_and_token() {
        assert!(Imagen::fast(Client::new(), "", "t", DEFAULT_IMAGEN_BASE_URL).is_err());
        assert!(Imagen::fast(Client::new(), "p", " ", DEFAULT_IMAGEN_BASE_URL).is_err());
    }
}
