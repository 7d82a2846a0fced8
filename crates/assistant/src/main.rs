//! Interactive tool-routing assistant - main entry point.

use anyhow::Context;
use assistant::commands::*;
use assistant::config::{Config, ImagesConfig};
use assistant::{Agent, AppResult, Dispatcher, Router, UnconfiguredBackend};
use conversation_store::{FileStore, Transcript};
use llm_client::{ChatBackend, LlmClient};
use secrecy::{ExposeSecret, SecretString};
use slide_deck::images::{FalFlux, Imagen, TogetherSdxl, Unsplash};
use slide_deck::{
    DeckGenerator, GeminiClient, HttpImageFetcher, ImageBackend, ImageError, ImageService,
    PresentationLibrary,
};
use std::sync::Arc;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tools::{ToolExecutor, ToolRegistry};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.agent.log_level);

    info!("Starting assistant...");

    // Routing agent
    let backend: Arc<dyn ChatBackend> = match &config.llm.api_key {
        Some(key) => Arc::new(
            LlmClient::new(
                secret(key),
                &config.llm.base_url,
                &config.llm.routing_model,
                config.llm.timeout,
            )
            .context("Failed to create chat client")?,
        ),
        None => {
            warn!("LLM__API_KEY not set - queries will be recorded as errors");
            Arc::new(UnconfiguredBackend)
        }
    };

    let registry: Arc<ToolRegistry> = Arc::new(config.agent.toolset.registry());
    let executor = Arc::new(
        ToolExecutor::new(registry.clone())
            .with_timeout(config.agent.tool_timeout.as_secs().max(1))
            .with_max_response_len(config.agent.max_tool_output),
    );
    info!(toolset = ?config.agent.toolset, tools = ?registry.routes(), "Tools registered");

    let transcript = Transcript::new();
    let agent = Arc::new(Agent::new(
        Router::new(backend.clone(), registry.clone(), &config.llm.routing_model),
        Dispatcher::new(
            backend,
            executor,
            &config.llm.tool_model,
            &config.llm.general_model,
        ),
        transcript.clone(),
    ));

    // Slide decks
    let http = reqwest::Client::builder()
        .timeout(config.deck.timeout)
        .build()
        .context("Failed to create HTTP client")?;

    let images = Arc::new(image_service(&config.images, &http));
    info!(models = ?images.models(), "Image back ends ready");

    let generator = match &config.deck.gemini_api_key {
        Some(key) => {
            let content = GeminiClient::new(
                secret(key),
                &config.deck.gemini_base_url,
                &config.deck.gemini_model,
                config.deck.timeout,
            )?;
            Some(Arc::new(
                DeckGenerator::new(Arc::new(content), images)
                    .with_image_concurrency(config.deck.image_concurrency),
            ))
        }
        None => {
            warn!("DECK__GEMINI_API_KEY not set - deck generation disabled");
            None
        }
    };

    let store = Arc::new(FileStore::new(&config.storage.data_dir));
    let library = Arc::new(PresentationLibrary::load(store).await?);

    // Create command handlers
    let handlers: Vec<Box<dyn CommandHandler>> = vec![
        Box::new(ChatHandler::new(agent)),
        Box::new(HelpHandler::new()),
        Box::new(HistoryHandler::new(transcript)),
        Box::new(ToolsHandler::new(registry)),
        Box::new(DeckHandler::new(generator, library.clone())),
        Box::new(DecksHandler::new(library.clone())),
        Box::new(ShowHandler::new(library.clone())),
        Box::new(EditHandler::new(library.clone())),
        Box::new(ExportHandler::new(
            library.clone(),
            Arc::new(HttpImageFetcher::new(http)),
            &config.deck.output_dir,
        )),
        Box::new(DeleteHandler::new(library)),
    ];

    info!("Registered {} command handlers", handlers.len());
    println!("Type a question, or !help for commands.");

    let mut lines = LinesStream::new(BufReader::new(stdin()).lines());

    // Main input loop
    loop {
        tokio::select! {
            line = lines.next() => {
                let line = match line {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                    None => break,
                };
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                match handlers.iter().find(|h| h.matches(input)) {
                    Some(handler) => match handler.execute(input).await {
                        Ok(response) => println!("{}", response),
                        Err(e) => {
                            error!(command = handler.name(), "Handler error: {}", e);
                            println!("Error: {}", e);
                        }
                    },
                    None => println!("Unknown command. Type !help for commands."),
                }
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}

/// Register every image back end whose credentials are configured.
fn image_service(config: &ImagesConfig, http: &reqwest::Client) -> ImageService {
    let mut service = ImageService::new();

    if let (Some(project), Some(token)) = (&config.google_project_id, &config.google_access_token) {
        service = register(
            service,
            Imagen::fast(http.clone(), project, secret(token), &config.imagen_base_url),
        );
        service = register(
            service,
            Imagen::quality(http.clone(), project, secret(token), &config.imagen_base_url),
        );
    }
    if let Some(key) = &config.fal_api_key {
        service = register(service, FalFlux::new(http.clone(), secret(key), &config.fal_base_url));
    }
    if let Some(key) = &config.together_api_key {
        service = register(
            service,
            TogetherSdxl::new(http.clone(), secret(key), &config.together_base_url),
        );
    }
    if let Some(key) = &config.unsplash_access_key {
        service = register(
            service,
            Unsplash::new(http.clone(), secret(key), &config.unsplash_base_url),
        );
    }

    service
}

fn register<B: ImageBackend + 'static>(
    service: ImageService,
    backend: Result<B, ImageError>,
) -> ImageService {
    match backend {
        Ok(backend) => service.with_backend(Arc::new(backend)),
        Err(e) => {
            warn!("Image back end skipped: {}", e);
            service
        }
    }
}

fn secret(key: &SecretString) -> &str {
    key.expose_secret().as_str()
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
