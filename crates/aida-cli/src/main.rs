use std::path::PathBuf;

use aida_infrastructure::ConfigService;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod host;

use commands::AppContext;

#[derive(Parser)]
#[command(name = "aida")]
#[command(about = "AIDA - AI business assistant for ERPNext", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to ~/.config/aida/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Origin of the ERP site, overriding the configuration
    #[arg(long, global = true)]
    erp_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent in an interactive session
    Chat,
    /// Initialize the widget and print its HTML
    Render {
        /// Render with the chat window open
        #[arg(long)]
        open: bool,
    },
    /// Run the settings form's connection test
    TestConnection,
    /// Create leads through the lead panel
    Leads {
        #[arg(long)]
        business_type: String,
        #[arg(long)]
        location: String,
        /// 5, 10, 20 or 50
        #[arg(long, default_value_t = 10)]
        count: u32,
    },
    /// Show the site's assistant settings and check them
    Settings {
        /// Validate and save settings read from a JSON file
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = service
        .load()
        .with_context(|| format!("Failed to load {}", service.path().display()))?;
    if let Some(url) = cli.erp_url {
        config.erp.base_url = url;
    }

    init_tracing(&config.logging.level);
    tracing::debug!("[CLI] Using ERP site {}", config.erp.base_url);

    let ctx = AppContext::new(config);
    match cli.command {
        Commands::Chat => commands::chat::run(&ctx).await?,
        Commands::Render { open } => commands::render::run(&ctx, open).await?,
        Commands::TestConnection => commands::connection::run(&ctx).await?,
        Commands::Leads {
            business_type,
            location,
            count,
        } => commands::leads::run(&ctx, &business_type, &location, count).await?,
        Commands::Settings { save } => commands::settings::run(&ctx, save.as_deref()).await?,
    }

    Ok(())
}
