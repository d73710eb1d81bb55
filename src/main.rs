//! Feedharvest main entry point
//!
//! This is the command-line interface for the feedharvest scraper.

use clap::Parser;
use feedharvest::harvest::harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Feedharvest: a feed and comment-thread harvester
///
/// Feedharvest pulls listing feeds and their nested comment threads from a
/// content-aggregation API and persists them as CSV tables, with bounded
/// retries and batch-limited concurrent detail fetches.
#[derive(Parser, Debug)]
#[command(name = "feedharvest")]
#[command(version = "1.0.0")]
#[command(about = "A feed and comment-thread harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match feedharvest::config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    match harvest(config).await {
        Ok(()) => {
            tracing::info!("Harvest finished");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("feedharvest=info,warn"),
            1 => EnvFilter::new("feedharvest=debug,info"),
            2 => EnvFilter::new("feedharvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &feedharvest::config::Config) {
    println!("=== Feedharvest Dry Run ===\n");

    println!("Client:");
    println!("  User agent: {}", config.client.user_agent);
    println!("  Request timeout: {}s", config.client.request_timeout_secs);
    match &config.client.snapshot_dir {
        Some(dir) => println!("  Snapshot dir: {}", dir),
        None => println!("  Snapshot dir: (disabled)"),
    }

    match &config.proxy {
        Some(proxy) => {
            println!("\nForwarding proxy:");
            println!("  Endpoint: {}", proxy.base_url);
            println!("  Country: {}", proxy.country);
        }
        None => println!("\nForwarding proxy: (direct connection)"),
    }

    println!("\nHarvest:");
    println!("  API base: {}", config.harvest.base_url);
    println!("  Page limit: {}", config.harvest.page_limit);
    println!("  Max retries: {}", config.harvest.max_retries);
    println!("  Batch size: {}", config.harvest.batch_size);

    println!("\nOutput:");
    println!("  Data dir: {}", config.output.data_dir);

    println!("\nListings ({}):", config.harvest.listings.len());
    for listing in &config.harvest.listings {
        println!("  - {} -> {}.csv", listing, listing);
    }

    println!("\n✓ Configuration is valid");
}
