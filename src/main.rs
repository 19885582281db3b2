use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "auditboard")]
#[command(version, about = "Audit findings board - lanes, moves, and search against a REST backend")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file. If not provided, auditboard.toml is
    /// searched in the working directory, then the user config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend collection URL. Overrides config file and environment.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the board and render it lane by lane
    Show {
        /// Only render this lane
        #[arg(long)]
        lane: Option<String>,
        /// Case-insensitive substring filter over the configured search fields
        #[arg(short, long)]
        query: Option<String>,
        /// 1-based page of each lane to render
        #[arg(long, default_value = "1")]
        page: usize,
        /// Cards per page
        #[arg(long, default_value = "20")]
        per_page: usize,
    },
    /// Move a card between lanes
    Move {
        /// Card id (string or numeric)
        id: String,
        /// Source lane key
        from: String,
        /// Target lane key
        to: String,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => auditboard::config::AppConfig::load_from(path)?,
        None => auditboard::config::AppConfig::discover()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }

    match &cli.command {
        Commands::Show {
            lane,
            query,
            page,
            per_page,
        } => {
            cmd::cmd_show(
                &config,
                lane.as_deref(),
                query.as_deref().unwrap_or(""),
                *page,
                *per_page,
            )
            .await
        }
        Commands::Move { id, from, to } => cmd::cmd_move(&config, id, from, to).await,
        Commands::Config => cmd::cmd_config(&config),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("auditboard={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
