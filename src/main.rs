// src/main.rs - Bridge entry point
use clap::Parser;
use octo_bridge::{config, octo, web};
use std::path::PathBuf;

/// HTTP bridge for an OctoPrint-style printer control server
#[derive(Parser, Debug)]
#[command(name = "octo-bridge", about = "Normalizes and re-exposes printer, job and file state.")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve synthetic data instead of calling the printer
    #[arg(long)]
    mock: bool,

    /// Listening port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let cli = Cli::parse();

    // A missing .env is normal outside development.
    let dotenv = dotenvy::dotenv();

    let mut config = match &cli.config {
        Some(path) => config::load_config(&path.to_string_lossy()).map_err(|e| {
            eprintln!("Failed to load config from '{}': {}", path.display(), e);
            Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
        })?,
        None => config::Config::default(),
    };
    config.apply_env()?;
    if cli.mock {
        config.octoprint.mock = true;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(config.logging.max_level())
        .init();

    tracing::info!("Starting octo-bridge");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    match dotenv {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env loaded: {}", e),
    }

    config.validate().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
    })?;

    let api = octo::connect(&config.octoprint)?;
    web::serve(&config.server, api).await?;

    Ok(())
}
