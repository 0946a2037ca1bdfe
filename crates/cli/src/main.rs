//! mockrag CLI: the main entry point.
//!
//! Commands:
//! - `serve`     - Start the HTTP gateway
//! - `classify`  - Show which template a query selects
//! - `templates` - List the templates a directory provides
//! - `doctor`    - Diagnose configuration and templates
//! - `init`      - Write a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "mockrag",
    about = "mockrag: deterministic stand-in for a multi-agent retrieval API",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.mockrag/config.toml)
    #[arg(short, long, global = true, env = "MOCKRAG_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the template directory
        #[arg(short, long)]
        templates: Option<PathBuf>,
    },

    /// Classify a query and print the selected template key
    Classify {
        /// The query text
        query: String,

        /// Also show the rule that fired and the full rule chain
        #[arg(long)]
        explain: bool,
    },

    /// List loaded templates and any skipped files
    Templates {
        /// Override the template directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Diagnose configuration and templates
    Doctor,

    /// Write the default config file if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config_path = cli
        .config
        .unwrap_or_else(|| mockrag_config::AppConfig::config_dir().join("config.toml"));

    match cli.command {
        Commands::Serve { port, templates } => {
            commands::serve::run(&config_path, port, templates).await?
        }
        Commands::Classify { query, explain } => {
            commands::classify::run(&config_path, &query, explain)?
        }
        Commands::Templates { dir } => commands::templates::run(&config_path, dir)?,
        Commands::Doctor => commands::doctor::run(&config_path)?,
        Commands::Init => commands::init::run(&config_path)?,
    }

    Ok(())
}
