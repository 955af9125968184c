//! # Originality CLI (`orig`)
//!
//! Scores how original a project idea is against a pre-built snapshot of
//! prior submissions, and serves the same check over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! orig --config ./config/orig.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `orig check --title ".."` | Score one idea and print neighbors and suggestions |
//! | `orig stats` | Summarize the loaded snapshot |
//! | `orig serve` | Start the HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! orig check --title "Offline triage notes" \
//!     --description "Nurses in rural clinics record triage offline and sync later" \
//!     --tag health --k 5
//!
//! orig check --title "Offline triage notes" --json
//!
//! RUST_LOG=debug orig serve --config ./config/orig.toml
//! ```

use clap::{Parser, Subcommand};
use originality::check_cmd;
use originality::config;
use originality::engine::Engine;
use originality::server;
use originality::stats;
use originality_core::check::CheckRequest;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Originality CLI: estimate how original a project idea is relative to a
/// corpus of prior submissions.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/orig.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "orig",
    about = "Originality — score a project idea against prior submissions",
    version,
    long_about = "Retrieves semantically similar prior projects from an all-time and a recent \
    corpus slice, re-weights similarity by shared rare vocabulary, and reports an originality \
    score, the closest neighbors, a trend, and suggestions."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/orig.toml`.
    #[arg(long, global = true, default_value = "./config/orig.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Score one idea.
    ///
    /// Prints both slice scores, their labels, the trend, the closest
    /// admissible neighbors, and suggestions.
    Check {
        /// Project title.
        #[arg(long)]
        title: String,

        /// Free-text description.
        #[arg(long, default_value = "")]
        description: String,

        /// Tag (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Neighbors to keep per slice (defaults to `retrieval.default_k`).
        #[arg(long)]
        k: Option<usize>,

        /// Print the JSON response body instead of a text report.
        #[arg(long)]
        json: bool,
    },

    /// Summarize the loaded snapshot.
    Stats,

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_config(&cli.config)?;
    let engine = Engine::from_config(cfg)?;

    match cli.command {
        Commands::Check {
            title,
            description,
            tags,
            k,
            json,
        } => {
            let req = CheckRequest {
                title,
                description,
                tags,
                k,
            };
            check_cmd::run_check(&engine, &req, json).await?;
        }
        Commands::Stats => {
            stats::run_stats(&engine);
        }
        Commands::Serve => {
            server::run_server(Arc::new(engine)).await?;
        }
    }

    Ok(())
}
