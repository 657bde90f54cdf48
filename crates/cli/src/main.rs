//! citeline CLI
//!
//! Main entry point for the citeline command-line tool.
//! Asks the legal RAG backend questions and prints answers with their
//! citations, or normalizes a saved backend reply offline.

mod commands;

use citeline_core::{config::AppConfig, logging, AppResult};
use clap::{Parser, Subcommand};
use commands::{AskCommand, NormalizeCommand};
use std::path::PathBuf;

/// citeline - cited answers from a legal RAG backend
#[derive(Parser, Debug)]
#[command(name = "citeline")]
#[command(about = "Cited answers from a legal RAG backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "CITELINE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "CITELINE_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL (e.g. http://127.0.0.1:8000)
    #[arg(short, long, global = true, env = "CITELINE_BACKEND_URL")]
    backend_url: Option<String>,

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
    /// Ask the backend a question, optionally about a document
    Ask(AskCommand),

    /// Normalize a saved backend reply (file or stdin)
    Normalize(NormalizeCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.workspace, cli.config)?.with_overrides(
        cli.backend_url,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.log_format, config.no_color)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Backend: {}", config.backend.analyze_url());

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Normalize(_) => "normalize",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Normalize(cmd) => cmd.execute(),
    };

    match &result {
        Ok(_) => tracing::debug!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
