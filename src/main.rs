use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loqa_kitchen::config::CaptureBackend;
use loqa_kitchen::voice::{LineCapture, VoiceCapture};
use loqa_kitchen::{chat, create_router, AppState, AssistantFactory, Config, RecipeCatalog};
use std::sync::Arc;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "loqa-kitchen")]
#[command(about = "Voice-controlled cooking assistant", long_about = None)]
struct Args {
    /// Configuration file (without extension)
    #[arg(short, long, default_value = "config/loqa-kitchen")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the kitchen display API
    Serve,
    /// Type commands in the terminal ("listen" captures a spoken one)
    Chat {
        /// Recipe to start with
        #[arg(short, long)]
        recipe: Option<String>,
    },
    /// List catalog recipes
    Recipes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let cfg = Config::load(&args.config)?;

    info!("Loqa Kitchen v0.1.0");
    info!("Loaded config: {}", cfg.service.name);

    let catalog = Arc::new(RecipeCatalog::load(cfg.recipes.catalog_path())?);

    match args.command {
        Commands::Recipes => {
            for name in catalog.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Serve => serve(&cfg, catalog).await,
        Commands::Chat { recipe } => chat(&cfg, catalog, recipe.as_deref()).await,
    }
}

async fn serve(cfg: &Config, catalog: Arc<RecipeCatalog>) -> Result<()> {
    let images_dir = catalog.images_dir();

    let mut assistant = AssistantFactory::create(cfg, catalog, None).await?;
    assistant.start_music().await;

    let state = AppState::new(assistant);
    let app = create_router(state.clone(), images_dir);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    let shutdown = Arc::clone(&state.shutdown);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown.notified() => {}
                _ = tokio::signal::ctrl_c() => info!("Interrupted"),
            }
        })
        .await
        .context("HTTP server failed")?;

    // Handlers may still hold clones of the state; flush speech only if we own it
    match Arc::try_unwrap(state.assistant) {
        Ok(assistant) => assistant.into_inner().shutdown().await,
        Err(_) => warn!("Session still referenced at shutdown, pending speech dropped"),
    }

    Ok(())
}

async fn chat(cfg: &Config, catalog: Arc<RecipeCatalog>, recipe: Option<&str>) -> Result<()> {
    // One stdin reader, shared with the capture when it also reads stdin
    let input = LineCapture::stdin();
    let capture = (cfg.voice.capture == CaptureBackend::Stdin)
        .then(|| Box::new(input.clone()) as Box<dyn VoiceCapture>);

    let mut assistant =
        AssistantFactory::create_with_capture(cfg, catalog, recipe, capture).await?;
    assistant.start_music().await;

    let result = chat::run(&mut assistant, &input, &mut std::io::stdout()).await;

    assistant.shutdown().await;
    result
}
