//! Binary entry point for engram.
//!
//! This binary provides the CLI and the interactive shell for the Engram
//! knowledge client.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use commands::{CaptureArgs, GraphAction, SettingsAction};
use engram::client::{HttpConfig, HttpCortexClient};
use engram::config::EngramConfig;
use engram::observability::{self, LoggingConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Engram - capture, recall and explore your personal knowledge.
#[derive(Parser)]
#[command(name = "engram")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cortex base URL, overriding the configuration.
    #[arg(long, global = true, env = "ENGRAM_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Capture a memory.
    Capture(CaptureArgs),

    /// Ask a question about your memories.
    Ask {
        /// The question.
        query: String,
    },

    /// Explore the knowledge graph.
    Graph {
        #[command(subcommand)]
        action: GraphAction,
    },

    /// Replace the content of a memory.
    Update {
        /// Memory ID.
        id: String,

        /// New content.
        content: String,
    },

    /// Show or change backend settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show the vault folder structure.
    Tree,

    /// Start the interactive shell.
    Shell,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match observability::with_bootstrap_logging(|| load_config(&cli)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(&LoggingConfig::from_settings(&config.logging, cli.verbose)) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Loads configuration, applying the `--api-url` override last.
fn load_config(cli: &Cli) -> engram::Result<EngramConfig> {
    let config = EngramConfig::load(cli.config.as_deref())?;
    Ok(match &cli.api_url {
        Some(url) => config.with_api_url(url.clone()),
        None => config,
    })
}

/// Runs the selected command.
fn run_command(command: Commands, config: EngramConfig) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    if let Commands::Completions { shell } = command {
        commands::cmd_completions(shell, &mut Cli::command(), &mut out);
        return Ok(());
    }

    let client = HttpCortexClient::new(&config.api.base_url)?
        .with_http_config(HttpConfig::from_settings(&config.api));
    tracing::debug!(base_url = %config.api.base_url, "Cortex client ready");

    let result = match command {
        Commands::Capture(args) => commands::cmd_capture(&client, &config, args, &mut input, &mut out),
        Commands::Ask { query } => commands::cmd_ask(&client, &config, &query, &mut out),
        Commands::Graph { action } => commands::cmd_graph(&client, &config, action, &mut input, &mut out),
        Commands::Update { id, content } => commands::cmd_update(&client, &id, &content, &mut out),
        Commands::Settings { action } => {
            commands::cmd_settings(&client, &config, action, &mut input, &mut out)
        },
        Commands::Tree => commands::cmd_tree(&client, &mut out),
        Commands::Shell => commands::cmd_shell(&client, config, input, &mut out),
        Commands::Completions { .. } => Ok(()),
    };
    out.flush()?;
    result
}
