//! Export a presentation to a `.pptx` file.

mod pptx;

pub use pptx::{escape_xml, DeckMeta, Frame, ImageFormat, Picture, SlideSpec, TextBox};

use crate::error::{DeckError, ImageError};
use crate::images::decode_data_url;
use crate::types::{Presentation, Slide};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

pub const AUTHOR: &str = "AI Presentation Generator";
pub const REFERENCES_TITLE: &str = "References";

const TITLE_FRAME: Frame = Frame::new(5.0, 5.0, 90.0, 15.0);
const IMAGE_FRAME: Frame = Frame::new(5.0, 25.0, 45.0, 60.0);
const BODY_BESIDE_IMAGE: Frame = Frame::new(55.0, 25.0, 40.0, 50.0);
const BODY_FULL_WIDTH: Frame = Frame::new(5.0, 25.0, 90.0, 50.0);
const SOURCES_FRAME: Frame = Frame::new(5.0, 85.0, 90.0, 10.0);
const REFERENCES_FRAME: Frame = Frame::new(5.0, 25.0, 90.0, 70.0);

/// Downloaded image bytes and their declared media type.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Downloads remote slide images for embedding.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageError>;
}

#[derive(Clone, Default)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Api {
                backend: "image download",
                status: status.as_u16(),
                message: url.to_string(),
            });
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = response.bytes().await?.to_vec();
        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}

/// File name derived from the topic: non-alphanumerics become `_`.
pub fn file_name(topic: &str) -> String {
    let stem: String = topic
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_presentation.pptx", stem)
}

/// Write `presentation` into `dir` and return the file path.
///
/// A slide image that cannot be decoded or downloaded is left out of the
/// deck; the body text then spans the full width.
#[instrument(skip(presentation, fetcher), fields(id = %presentation.id))]
pub async fn export_pptx(
    presentation: &Presentation,
    fetcher: &dyn ImageFetcher,
    dir: &Path,
) -> Result<PathBuf, DeckError> {
    let mut slides = Vec::with_capacity(presentation.slides.len() + 1);
    for slide in &presentation.slides {
        let picture = match slide.image_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => resolve_image(url, fetcher).await,
            None => None,
        };
        slides.push(layout_slide(slide, picture));
    }
    if !presentation.references.is_empty() {
        slides.push(references_slide(&presentation.references));
    }

    let meta = DeckMeta {
        title: presentation.config.topic.clone(),
        author: AUTHOR.to_string(),
        colors: presentation.config.style.colors(),
        created: Utc::now(),
    };
    let bytes = pptx::write_package(&meta, &slides)?;

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name(&presentation.config.topic));
    tokio::fs::write(&path, &bytes).await?;

    info!(path = %path.display(), slides = slides.len(), "Exported presentation");
    Ok(path)
}

async fn resolve_image(url: &str, fetcher: &dyn ImageFetcher) -> Option<Picture> {
    let fetched = if url.starts_with("data:") {
        decode_data_url(url).map(|(mime, bytes)| FetchedImage {
            bytes,
            content_type: Some(mime),
        })
    } else {
        fetcher.fetch(url).await
    };

    let image = match fetched {
        Ok(image) => image,
        Err(e) => {
            warn!(error = %e, "Failed to add image to slide");
            return None;
        }
    };

    match ImageFormat::detect(&image.bytes, image.content_type.as_deref()) {
        Some(format) => Some(Picture {
            frame: IMAGE_FRAME,
            bytes: image.bytes,
            format,
        }),
        None => {
            warn!(content_type = ?image.content_type, "Unsupported image format, skipping");
            None
        }
    }
}

fn layout_slide(slide: &Slide, picture: Option<Picture>) -> SlideSpec {
    let body_frame = if picture.is_some() {
        BODY_BESIDE_IMAGE
    } else {
        BODY_FULL_WIDTH
    };

    let mut texts = vec![
        TextBox {
            frame: TITLE_FRAME,
            text: slide.title.clone(),
            size_pt: 44,
            bold: true,
            italic: false,
        },
        TextBox {
            frame: body_frame,
            text: slide.content.clone(),
            size_pt: 24,
            bold: false,
            italic: false,
        },
    ];

    if !slide.sources().is_empty() {
        texts.push(TextBox {
            frame: SOURCES_FRAME,
            text: slide.sources().join("\n"),
            size_pt: 12,
            bold: false,
            italic: true,
        });
    }

    SlideSpec {
        texts,
        picture,
        notes: slide.notes.clone().filter(|n| !n.trim().is_empty()),
    }
}

fn references_slide(references: &[String]) -> SlideSpec {
    SlideSpec {
        texts: vec![
            TextBox {
                frame: TITLE_FRAME,
                text: REFERENCES_TITLE.to_string(),
                size_pt: 44,
                bold: true,
                italic: false,
            },
            TextBox {
                frame: REFERENCES_FRAME,
                text: references.join("\n\n"),
                size_pt: 18,
                bold: false,
                italic: false,
            },
        ],
        picture: None,
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::to_data_url;
    use crate::types::{PresentationConfig, Theme};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use std::io::Read;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

    struct RecordingFetcher {
        urls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingFetcher {
        fn new(fail: bool) -> Self {
            Self {
                urls: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl ImageFetcher for RecordingFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageError> {
            self.urls.lock().unwrap().push(url.to_string());
            if self.fail {
                return Err(ImageError::NoImage("test"));
            }
            Ok(FetchedImage {
                bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
                content_type: Some("image/jpeg".into()),
            })
        }
    }

    fn slide(index: usize, image_url: Option<String>) -> Slide {
        Slide {
            id: format!("slide-{}", index),
            title: format!("Slide {}", index),
            content: "Point one\nPoint two".into(),
            image_url,
            notes: Some(format!("notes {}", index)),
            sources: Some(vec!["Source A".into(), "Source B".into()]),
            image_prompt: None,
            generated_at: None,
        }
    }

    fn presentation(slides: Vec<Slide>, references: Vec<String>) -> Presentation {
        let mut config = PresentationConfig::new("Cloud Costs: 2024!", slides.len());
        config.style = Theme::Kraft;
        let now = Utc::now();
        Presentation {
            id: "presentation-1".into(),
            config,
            slides,
            references,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(path: &Path, name: &str) -> Option<String> {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut entry = archive.by_name(name).ok()?;
        let mut out = String::new();
        entry.read_to_string(&mut out).ok()?;
        Some(out)
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let file = std::fs::File::open(path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        archive.file_names().map(String::from).collect()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name("Cloud Costs: 2024!"),
            "cloud_costs__2024__presentation.pptx"
        );
        assert_eq!(file_name("Rust"), "rust_presentation.pptx");
    }

    #[test]
    fn test_layout_with_and_without_image() {
        let with = layout_slide(
            &slide(0, None),
            Some(Picture {
                frame: IMAGE_FRAME,
                bytes: PNG_BYTES.to_vec(),
                format: ImageFormat::Png,
            }),
        );
        assert_eq!(with.texts[1].frame, BODY_BESIDE_IMAGE);
        assert_eq!(with.texts[2].text, "Source A\nSource B");
        assert!(with.texts[2].italic);

        let without = layout_slide(&slide(0, None), None);
        assert_eq!(without.texts[1].frame, BODY_FULL_WIDTH);
        assert_eq!(without.notes.as_deref(), Some("notes 0"));
    }

    #[tokio::test]
    async fn test_export_writes_slides_and_references() {
        let dir = tempfile::tempdir().unwrap();
        let data_url = to_data_url("image/png", &STANDARD.encode(PNG_BYTES));
        let deck = presentation(
            vec![
                slide(0, Some(data_url)),
                slide(1, Some("https://images.example/photo".into())),
                slide(2, None),
            ],
            vec!["Ref one".into(), "Ref two".into()],
        );
        let fetcher = RecordingFetcher::new(false);

        let path = export_pptx(&deck, &fetcher, dir.path()).await.unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "cloud_costs__2024__presentation.pptx"
        );
        assert_eq!(
            *fetcher.urls.lock().unwrap(),
            vec!["https://images.example/photo".to_string()]
        );

        let names = entry_names(&path);
        assert!(names.contains(&"ppt/media/image1.png".to_string()));
        assert!(names.contains(&"ppt/media/image2.jpeg".to_string()));

        let slide2 = entry(&path, "ppt/slides/slide2.xml").unwrap();
        assert!(slide2.contains("Slide 1"));
        assert!(slide2.contains("<p:pic>"));

        let slide3 = entry(&path, "ppt/slides/slide3.xml").unwrap();
        assert!(!slide3.contains("<p:pic>"));

        let references = entry(&path, "ppt/slides/slide4.xml").unwrap();
        assert!(references.contains(">References<"));
        assert!(references.contains("Ref one"));
        assert!(references.contains(r#"sz="1800""#));
        assert!(entry(&path, "ppt/slides/slide5.xml").is_none());

        let notes = entry(&path, "ppt/notesSlides/notesSlide3.xml").unwrap();
        assert!(notes.contains("notes 2"));

        let master = entry(&path, "ppt/slideMasters/slideMaster1.xml").unwrap();
        assert!(master.contains("FDE68A"));
    }

    #[tokio::test]
    async fn test_failed_download_skips_image() {
        let dir = tempfile::tempdir().unwrap();
        let deck = presentation(vec![slide(0, Some("https://broken".into()))], vec![]);

        let path = export_pptx(&deck, &RecordingFetcher::new(true), dir.path())
            .await
            .unwrap();

        let slide1 = entry(&path, "ppt/slides/slide1.xml").unwrap();
        assert!(!slide1.contains("<p:pic>"));
        assert!(entry(&path, "ppt/slides/slide2.xml").is_none());
    }

    #[tokio::test]
    async fn test_http_fetcher() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/photo.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF]),
            )
            .mount(&server)
            .await;

        let fetcher = HttpImageFetcher::default();
        let image = fetcher
            .fetch(&format!("{}/photo.jpg", server.uri()))
            .await
            .unwrap();
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));

        let missing = fetcher.fetch(&format!("{}/nope", server.uri())).await;
        assert!(missing.is_err());
    }
}
