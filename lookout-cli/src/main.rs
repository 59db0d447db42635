//! Lookout CLI - Command-line interface for Lookout
//!
//! Loads an explore graph from a file or a stored snapshot and searches
//! its nodes, either once or interactively.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod pick;

use commands::SourceArgs;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "lookout")]
#[command(author = "Lookout Contributors")]
#[command(version)]
#[command(about = "Search the nodes of an attack-path explore graph", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to <config dir>/lookout/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot store directory, overriding the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,

    /// Search the graph's nodes by label or object id
    Search {
        #[command(flatten)]
        source: SourceArgs,

        /// Search query (empty lists everything)
        #[arg(default_value = "")]
        query: String,

        /// Maximum results to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Search interactively and pick a node
    Pick {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show one node and its relationships
    Show {
        #[command(flatten)]
        source: SourceArgs,

        /// Node id
        id: String,
    },

    /// Store a graph file as a named snapshot
    Import {
        /// Graph JSON file
        file: PathBuf,

        /// Snapshot name
        #[arg(short, long)]
        name: String,
    },

    /// List stored snapshots
    Snapshots,

    /// Delete a stored snapshot
    Forget {
        /// Snapshot name
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli
        .config
        .or_else(CliConfig::default_path)
        .ok_or("could not determine a config directory; pass --config")?;

    let mut config = CliConfig::load_from(&config_path)?;
    if let Some(store) = cli.store {
        config.store_path = Some(store);
    }

    match cli.command {
        Commands::Init => commands::init(&config_path),
        Commands::Search {
            source,
            query,
            limit,
            json,
        } => commands::search(&config, &source, &query, limit, json),
        Commands::Pick { source } => commands::pick(&config, &source),
        Commands::Show { source, id } => commands::show(&config, &source, &id),
        Commands::Import { file, name } => commands::import(&config, &file, &name),
        Commands::Snapshots => commands::snapshots(&config),
        Commands::Forget { name } => commands::forget(&config, &name),
    }
}
