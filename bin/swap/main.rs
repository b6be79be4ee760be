//! Swap CLI
//!
//! Terminal front end for the ETH ⇄ XLM swap wizard.

mod commands;
mod style;
mod wizard;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swap_typeform::SwapConfig;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "swap")]
#[command(about = "Swap ETH and XLM through an interactive typeform wizard")]
struct Cli {
    /// Config file (defaults to ~/.swap-typeform/config.toml when present)
    #[arg(short, long, global = true, env = "SWAP_CONFIG")]
    config: Option<PathBuf>,

    /// Quote proxy base URL
    #[arg(long, global = true, env = "SWAP_QUOTE_API_BASE")]
    quote_api: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive swap wizard (default)
    Wizard,
    /// Fetch a single conversion quote
    Quote {
        /// Amount of the source asset
        amount: String,
        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay the swap progress milestones
    Progress {
        /// Swap direction label, e.g. "ETH → XLM"
        #[arg(short, long, conflicts_with = "query")]
        direction: Option<String>,
        /// Handoff query, e.g. "direction=ETH%20%E2%86%92%20XLM"
        #[arg(short, long)]
        query: Option<String>,
    },
}

pub fn print_banner() {
    println!(
        "{}",
        style::style_cyan(
            r#"
  ███████╗██╗    ██╗ █████╗ ██████╗
  ██╔════╝██║    ██║██╔══██╗██╔══██╗
  ███████╗██║ █╗ ██║███████║██████╔╝
  ╚════██║██║███╗██║██╔══██║██╔═══╝
  ███████║╚███╔███╔╝██║  ██║██║
  ╚══════╝ ╚══╝╚══╝ ╚═╝  ╚═╝╚═╝
"#
        )
    );
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("swap_typeform={}", level).parse()?)
                .add_directive(format!("swap={}", level).parse()?),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = SwapConfig::load_or_default(cli.config.as_deref())?;
    if let Some(base) = cli.quote_api {
        config.quote_api_base = base;
    }
    debug!("Using quote endpoint {}", config.quote_url());

    match cli.command.unwrap_or(Commands::Wizard) {
        Commands::Wizard => wizard::run_swap_wizard(&config).await,
        Commands::Quote { amount, json } => commands::quote::run(&config, &amount, json).await,
        Commands::Progress { direction, query } => {
            commands::progress::run(&config, direction, query).await
        }
    }
}
