//! Campus Assistant CLI
//!
//! Main entry point for the `campus` command-line tool.
//! Provides commands for asking questions, managing the knowledge index,
//! and running the HTTP API server.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ChatCommand, IndexCommand, ServeCommand, StatsCommand};
use campus_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Campus Assistant CLI - retrieval-grounded campus Q&A
#[derive(Parser, Debug)]
#[command(name = "campus")]
#[command(about = "Retrieval-grounded campus question answering", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "CAMPUS_CONFIG")]
    config: Option<PathBuf>,

    /// Completion model identifier
    #[arg(short, long, global = true, env = "CAMPUS_MODEL")]
    model: Option<String>,

    /// Answer language (en, fr)
    #[arg(short, long, global = true, env = "CAMPUS_LANGUAGE")]
    language: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the assistant a question
    Chat(ChatCommand),

    /// Load and index a knowledge base file
    Index(IndexCommand),

    /// Show vector index statistics
    Stats(StatsCommand),

    /// Run the HTTP API server
    Serve(ServeCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.model,
        cli.language,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Campus Assistant CLI starting");
    tracing::debug!("Model: {}", config.openai_model);
    tracing::debug!("Index: {}", config.index_name);

    // Credentials must be checked before any provider is constructed
    config.validate()?;

    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Index(_) => "index",
        Commands::Stats(_) => "stats",
        Commands::Serve(_) => "serve",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Index(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
        Commands::Serve(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
