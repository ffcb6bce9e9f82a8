//! Nara bid-notice collector CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nara_collector::{
    error::Result,
    models::{Config, DateRange},
    pipeline::{self, FilterInput},
};
use tokio_util::sync::CancellationToken;

/// Collects public-procurement bid notices
#[derive(Parser, Debug)]
#[command(
    name = "nara-collector",
    version,
    about = "Public-procurement bid notice collector"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a single page without filtering
    Page {
        /// Range start, YYYYMMDDHHMM
        #[arg(long)]
        start: String,

        /// Range end, YYYYMMDDHHMM
        #[arg(long)]
        end: String,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Rows per page
        #[arg(long, default_value_t = 50)]
        rows: u32,
    },

    /// Collect every page, filter, and merge into one ordered result
    Collect {
        /// Range start, YYYYMMDDHHMM
        #[arg(long)]
        start: String,

        /// Range end, YYYYMMDDHHMM
        #[arg(long)]
        end: String,

        /// Minimum assigned budget in won
        #[arg(long, conflicts_with = "min_budget_eok")]
        min_budget: Option<String>,

        /// Minimum assigned budget in eok (100,000,000 won)
        #[arg(long)]
        min_budget_eok: Option<String>,

        /// Comma-separated title keywords (any may match)
        #[arg(long)]
        keywords: Option<String>,

        /// Business category, e.g. 물품 or 용역
        #[arg(long)]
        category: Option<String>,

        /// Override collector.max_pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Page {
            start,
            end,
            page,
            rows,
        } => {
            let range = DateRange::new(start, end)?;
            let result = pipeline::run_page(&config, &range, rows, page).await?;
            let json = serde_json::json!({
                "summary": result.summary,
                "raw_item_count": result.raw_item_count,
                "records": result.records,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }

        Command::Collect {
            start,
            end,
            min_budget,
            min_budget_eok,
            keywords,
            category,
            max_pages,
            output,
        } => {
            let range = DateRange::new(start, end)?;
            let filters = pipeline::build_filters(&FilterInput {
                min_budget: min_budget.as_deref(),
                min_budget_eok: min_budget_eok.as_deref(),
                keywords: keywords.as_deref(),
                category: category.as_deref(),
            })?;

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("Interrupt received, cancelling collection...");
                    on_ctrl_c.cancel();
                }
            });

            let aggregate =
                pipeline::run_collect(&config, &range, &filters, max_pages, &cancel).await?;
            pipeline::write_json(&aggregate, output.as_deref())?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            if config.api.service_key.trim().is_empty() {
                log::warn!("api.service_key is empty; set it or export NARA_SERVICE_KEY");
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
