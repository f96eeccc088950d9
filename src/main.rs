// src/main.rs

//! wikimaint CLI
//!
//! One subcommand per maintenance report, meant to be driven by a
//! scheduler that never overlaps runs against the same wiki.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::Client;
use wikimaint::{
    error::Result,
    models::Config,
    pipeline::{run_links, run_querypages},
    services::WebhookClient,
    storage::SnapshotStore,
    utils::http,
};

/// wikimaint - MediaWiki maintenance reports
#[derive(Parser, Debug)]
#[command(
    name = "wikimaint",
    version,
    about = "Scheduled MediaWiki maintenance reports with Discord delivery"
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
    /// Check external links for reachability and report changes
    Links,

    /// Report changes on special query pages and lint errors
    Querypages,

    /// Run every report in sequence
    Pipeline,

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

/// Build the services shared by every report run.
fn build_services(config: &Config) -> Result<(Client, SnapshotStore, WebhookClient)> {
    let client = http::create_client(&config.checker)?;
    let store = SnapshotStore::new(&config.storage.data_dir, &config.wiki.id);
    let webhook = WebhookClient::new(&config.webhook, client.clone());
    Ok((client, store, webhook))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli.config)?;
    config.validate()?;
    log::info!(
        "Loaded configuration for wiki '{}' from {}",
        config.wiki.id,
        cli.config.display()
    );

    match cli.command {
        Command::Links => {
            let (client, store, webhook) = build_services(&config)?;
            run_links(&config, &client, &store, &webhook).await?;
        }

        Command::Querypages => {
            let (client, store, webhook) = build_services(&config)?;
            run_querypages(&config, &client, &store, &webhook).await?;
        }

        Command::Pipeline => {
            let (client, store, webhook) = build_services(&config)?;

            log::info!("Step 1/2: query page reports...");
            run_querypages(&config, &client, &store, &webhook).await?;

            log::info!("Step 2/2: external link report...");
            run_links(&config, &client, &store, &webhook).await?;
        }

        Command::Validate => {
            log::info!("Configuration OK");
        }
    }

    log::info!("Done!");

    Ok(())
}
