//! gitrat CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "gitrat")]
#[command(about = "Browse scraped group, subgroup and project hierarchies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Root path the cache directory is resolved against
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to gitrat.toml in the root, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },
    /// Load a dataset, build its hierarchy and report anomalies
    Check {
        /// Dataset name (file stem in the cache directory)
        dataset: Option<String>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // .env is optional
    dotenvy::dotenv().ok();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gitrat={log_level},tower_http={log_level}")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Commands::Version = cli.command {
        println!("gitrat v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing::info!("gitrat v{}", env!("CARGO_PKG_VERSION"));
    let mut config = Config::load(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port, host, open } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            config.open |= open;
            commands::serve(cli.root, config).await
        }
        Commands::Check { dataset } => {
            if let Some(dataset) = dataset {
                config.dataset = dataset;
            }
            commands::check(&cli.root, &config)
        }
        Commands::Version => Ok(()),
    }
}
