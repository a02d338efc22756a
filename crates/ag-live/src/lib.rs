//! Live-session runtime for the agenda.
//!
//! Drives the redirect engine from `ag-core` with:
//! - a ticking page clock
//! - a liveness endpoint client polled while a session's end is unconfirmed
//! - an explicit start/stop lifecycle per page

mod client;
mod driver;
mod ticker;

use thiserror::Error;

pub use client::{DEFAULT_TIMEOUT, LivenessSource, StatusClient, StreamStatus};
pub use driver::{
    DEFAULT_POLL_INTERVAL, DriverHandle, DriverOutcome, DriverSettings, Navigator, RedirectDriver,
};
pub use ticker::Ticker;

/// Runtime errors.
#[derive(Debug, Error)]
pub enum LiveError {
    /// The status endpoint URL cannot be used.
    #[error("invalid status endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("status endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The driver task panicked or was aborted.
    #[error("redirect driver task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
