use std::path::Path;

use ag_cli::commands::{generate, schedule, status, util, watch};
use ag_cli::{Cli, Commands, Config};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Some(Commands::Schedule { agenda, at, json }) => {
            let now = match at.as_deref() {
                Some(at) => util::parse_datetime(at, Utc::now())?,
                None => Utc::now(),
            };
            let load = util::load_agenda(&agenda)?;
            schedule::run(&mut stdout, &load.agenda, now, json)?;
        }
        Some(Commands::Watch {
            agenda,
            page,
            status_url,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            // Navigation lines are printed from the driver; release the lock.
            drop(stdout);
            watch::run(&mut std::io::stdout(), &agenda, page, status_url, &config)?;
        }
        Some(Commands::Status {
            event_id,
            status_url,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            status::run(&mut stdout, &event_id, status_url, &config)?;
        }
        Some(Commands::Generate { start, base_url }) => {
            let start = match start.as_deref() {
                Some(start) => util::parse_datetime(start, Utc::now())?,
                None => Utc::now(),
            };
            generate::run(&mut stdout, start, &base_url)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
