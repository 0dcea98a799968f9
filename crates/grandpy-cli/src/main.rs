//! GrandPy CLI - Command-line interface
//!
//! Usage:
//!   grandpy ask <question>
//!   grandpy normalize <text>
//!   grandpy section <file>

use anyhow::Context;
use clap::{Parser, Subcommand};
use grandpy_bot::GrandPy;
use grandpy_clients::{build_http_client, GoogleGeocoder, MediaWikiClient};
use grandpy_core::{AppConfig, LoggingConfig, Resources};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grandpy")]
#[command(about = "Ask GrandPy where a place is and hear its story")]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment variables still apply)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print the JSON answer
    Ask {
        /// Message to send to GrandPy
        question: String,
    },
    /// Show the normalized message and the question picked from it
    Normalize {
        /// Raw message
        text: String,
    },
    /// Print the first section of a plain-text wiki article
    Section {
        /// Article file
        file: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn ask(config: &AppConfig, question: &str) -> anyhow::Result<()> {
    config.validate()?;

    let resources = Resources::load(&config.resources);
    let http = build_http_client(&config.http)?;
    let place = Arc::new(GoogleGeocoder::with_client(http.clone(), &config.google)?);
    let wiki = Arc::new(MediaWikiClient::with_client(http, &config.wiki));
    let bot = GrandPy::from_resources(resources, place, wiki);

    tracing::debug!(question_len = question.len(), "Asking GrandPy");
    let payload = bot.handle_user_query(question).await?;
    tracing::info!(status = %payload.status, "GrandPy answered");
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn normalize(config: &AppConfig, text: &str) {
    let resources = Resources::load(&config.resources);
    let parser = grandpy_parser::Parser::from_resources(&resources);

    println!("normalized: {}", parser.normalizer().normalize(text));
    println!("question:   {}", parser.parse_question(text));
}

fn read_section(file: &Path) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let section = grandpy_parser::get_section(&text);
    if section.is_empty() {
        tracing::warn!(file = %file.display(), "No section found");
    }
    Ok(section)
}

fn section(file: &Path) -> anyhow::Result<()> {
    println!("{}", read_section(file)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Ask { question } => ask(&config, &question).await?,
        Commands::Normalize { text } => normalize(&config, &text),
        Commands::Section { file } => section(&file)?,
    }

    Ok(())
}
