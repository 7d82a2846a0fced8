//! Hosted image back ends and the fallback chain over them.
//!
//! Each back end speaks its own request/response shape. [`ImageService`]
//! tries the configured one first, then the secondary diffusion service,
//! then stock-photo search, and finally returns [`FALLBACK_IMAGE_URL`].
//! It never fails.

mod fal;
mod imagen;
mod together;
mod unsplash;

pub use fal::{FalFlux, DEFAULT_FAL_BASE_URL};
pub use imagen::{Imagen, DEFAULT_IMAGEN_BASE_URL};
pub use together::{TogetherSdxl, DEFAULT_TOGETHER_BASE_URL};
pub use unsplash::{Unsplash, DEFAULT_UNSPLASH_BASE_URL};

use crate::error::ImageError;
use crate::types::ImageModel;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Returned when every back end in the chain has failed.
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1579546929518-9e396f3cc809";

/// Model to fall back to when the primary fails.
pub const SECONDARY_MODEL: ImageModel = ImageModel::FalFlux;

/// Stock-photo search, tried after the secondary.
pub const STOCK_MODEL: ImageModel = ImageModel::Unsplash;

/// A hosted image generator or search API.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Which image model this back end serves.
    fn model(&self) -> ImageModel;

    /// Produce an image URL (remote or `data:`) for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ImageError>;
}

/// Ordered fallback over the registered back ends.
#[derive(Clone, Default)]
pub struct ImageService {
    backends: Vec<Arc<dyn ImageBackend>>,
}

impl ImageService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a back end. A later registration for the same model
    /// replaces the earlier one.
    pub fn with_backend(mut self, backend: Arc<dyn ImageBackend>) -> Self {
        self.backends.retain(|b| b.model() != backend.model());
        self.backends.push(backend);
        self
    }

    pub fn models(&self) -> Vec<ImageModel> {
        self.backends.iter().map(|b| b.model()).collect()
    }

    fn backend(&self, model: ImageModel) -> Option<&Arc<dyn ImageBackend>> {
        self.backends.iter().find(|b| b.model() == model)
    }

    /// Back ends tried for `primary`, in order, skipping duplicates and
    /// models with no registered back end.
    pub fn chain(&self, primary: ImageModel) -> Vec<&Arc<dyn ImageBackend>> {
        let mut order: Vec<ImageModel> = Vec::with_capacity(3);
        for model in [primary, SECONDARY_MODEL, STOCK_MODEL] {
            if !order.contains(&model) {
                order.push(model);
            }
        }
        order
            .into_iter()
            .filter_map(|model| self.backend(model))
            .collect()
    }

    /// Get an image for `prompt`, falling back down the chain.
    pub async fn generate(&self, prompt: &str, primary: ImageModel) -> String {
        for backend in self.chain(primary) {
            match backend.generate(prompt).await {
                Ok(url) => {
                    debug!(model = %backend.model(), "Image generated");
                    return url;
                }
                Err(e) => {
                    warn!(
                        model = %backend.model(),
                        error = %e,
                        "Image back end failed, falling back"
                    );
                }
            }
        }

        info!(%primary, "All image back ends failed, using fallback image");
        FALLBACK_IMAGE_URL.to_string()
    }
}

/// Wrap base64 image data in a `data:` URL.
pub fn to_data_url(mime: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime, base64_data)
}

/// Split a base64 `data:` URL into its media type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), ImageError> {
    let rest = url.strip_prefix("data:").ok_or(ImageError::InvalidDataUrl)?;
    let (meta, data) = rest.split_once(',').ok_or(ImageError::InvalidDataUrl)?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or(ImageError::InvalidDataUrl)?;
    let bytes = STANDARD.decode(data.trim())?;
    Ok((mime.to_string(), bytes))
}

/// Turn a non-2xx response into an [`ImageError::Api`].
async fn check_status(
    backend: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ImageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".into());
    Err(ImageError::Api {
        backend,
        status: status.as_u16(),
        message,
    })
}

fn require_key(value: &str, what: &'static str) -> Result<(), ImageError> {
    if value.trim().is_empty() {
        return Err(ImageError::NotConfigured(what));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBackend {
        model: ImageModel,
        result: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn ok(model: ImageModel, url: &'static str) -> Arc<Self> {
            Arc::new(Self {
                model,
                result: Some(url),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(model: ImageModel) -> Arc<Self> {
            Arc::new(Self {
                model,
                result: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ImageBackend for FakeBackend {
        fn model(&self) -> ImageModel {
            self.model
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ImageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .map(String::from)
                .ok_or(ImageError::NoImage("fake"))
        }
    }

    #[tokio::test]
    async fn test_primary_success() {
        let imagen = FakeBackend::ok(ImageModel::Imagen3Fast, "https://imagen/1.png");
        let fal = FakeBackend::ok(ImageModel::FalFlux, "https://fal/1.png");
        let service = ImageService::new()
            .with_backend(imagen.clone())
            .with_backend(fal.clone());

        let url = service.generate("a cat", ImageModel::Imagen3Fast).await;
        assert_eq!(url, "https://imagen/1.png");
        assert_eq!(fal.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_uses_secondary() {
        let imagen = FakeBackend::failing(ImageModel::Imagen3);
        let fal = FakeBackend::ok(ImageModel::FalFlux, "https://fal/1.png");
        let unsplash = FakeBackend::ok(ImageModel::Unsplash, "https://unsplash/1.jpg");
        let service = ImageService::new()
            .with_backend(imagen.clone())
            .with_backend(fal)
            .with_backend(unsplash.clone());

        let url = service.generate("a cat", ImageModel::Imagen3).await;
        assert_eq!(url, "https://fal/1.png");
        assert_eq!(imagen.calls.load(Ordering::SeqCst), 1);
        assert_eq!(unsplash.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stock_photo_after_secondary() {
        let service = ImageService::new()
            .with_backend(FakeBackend::failing(ImageModel::TogetherSdxl))
            .with_backend(FakeBackend::failing(ImageModel::FalFlux))
            .with_backend(FakeBackend::ok(ImageModel::Unsplash, "https://unsplash/1.jpg"));

        let url = service.generate("a cat", ImageModel::TogetherSdxl).await;
        assert_eq!(url, "https://unsplash/1.jpg");
    }

    #[tokio::test]
    async fn test_all_failing_returns_fallback_url() {
        let service = ImageService::new()
            .with_backend(FakeBackend::failing(ImageModel::Imagen3Fast))
            .with_backend(FakeBackend::failing(ImageModel::FalFlux))
            .with_backend(FakeBackend::failing(ImageModel::Unsplash));

        let url = service.generate("a cat", ImageModel::Imagen3Fast).await;
        assert_eq!(url, FALLBACK_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_no_backends_returns_fallback_url() {
        let url = ImageService::new().generate("x", ImageModel::FalFlux).await;
        assert_eq!(url, FALLBACK_IMAGE_URL);
    }

    #[test]
    fn test_chain_skips_duplicates_and_missing() {
        let fal = FakeBackend::ok(ImageModel::FalFlux, "f");
        let unsplash = FakeBackend::ok(ImageModel::Unsplash, "u");
        let service = ImageService::new().with_backend(fal).with_backend(unsplash);

        let chain: Vec<ImageModel> = service
            .chain(ImageModel::FalFlux)
            .iter()
            .map(|b| b.model())
            .collect();
        assert_eq!(chain, vec![ImageModel::FalFlux, ImageModel::Unsplash]);

        let chain: Vec<ImageModel> = service
            .chain(ImageModel::Imagen3)
            .iter()
            .map(|b| b.model())
            .collect();
        assert_eq!(chain, vec![ImageModel::FalFlux, ImageModel::Unsplash]);
    }

    #[test]
    fn test_data_url_roundtrip() {
        let url = to_data_url("image/png", &STANDARD.encode([1u8, 2, 3]));
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![1, 2, 3]);

        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("data:image/png,raw").is_err());
    }
}
