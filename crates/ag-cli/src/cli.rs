//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

/// Live agenda toolkit.
///
/// Renders event agendas with live status and follows a visitor from one live
/// session to the next.
#[derive(Debug, Parser)]
#[command(name = "agenda", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the agenda grouped into slots with live status.
    Schedule {
        /// Agenda JSON file, or `-` for stdin.
        agenda: PathBuf,

        /// Evaluate status at this time (ISO 8601, "in 2 hours", "30 minutes ago").
        #[arg(long)]
        at: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Follow a visitor's page and redirect when their session ends.
    Watch {
        /// Agenda JSON file, or `-` for stdin.
        agenda: PathBuf,

        /// URL of the page the visitor is on.
        #[arg(long)]
        page: Url,

        /// Liveness endpoint (overrides config).
        #[arg(long)]
        status_url: Option<Url>,
    },

    /// Ask the liveness endpoint whether an event is streaming.
    Status {
        /// Event ID to query.
        event_id: String,

        /// Liveness endpoint (overrides config).
        #[arg(long)]
        status_url: Option<Url>,
    },

    /// Print a demo agenda as JSON.
    Generate {
        /// First session start (ISO 8601 or relative). Defaults to now.
        #[arg(long)]
        start: Option<String>,

        /// Base URL for session pages.
        #[arg(long, default_value = "https://live.example.com/")]
        base_url: Url,
    },
}
