//! Status command: a one-shot liveness check for an event.

use std::io::Write;

use ag_core::EventId;
use ag_live::StatusClient;
use anyhow::{Context, Result};
use url::Url;

use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    event_id: &str,
    status_url: Option<Url>,
    config: &Config,
) -> Result<()> {
    let event_id = EventId::new(event_id).context("invalid event ID")?;
    let status_url = resolve_status_url(status_url, config)?;
    let client = StatusClient::new(status_url, config.driver_settings().poll_timeout)
        .context("failed to create status client")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let status = runtime
        .block_on(client.stream_status(&event_id))
        .with_context(|| format!("failed to fetch stream status for {event_id}"))?;

    let state = if status.is_stream_live { "live" } else { "not live" };
    writeln!(writer, "{event_id}: {state}")?;
    Ok(())
}

/// Picks the endpoint from the command line, falling back to config.
pub fn resolve_status_url(flag: Option<Url>, config: &Config) -> Result<Url> {
    flag.or_else(|| config.status_url.clone()).context(
        "missing liveness endpoint (pass --status-url, set AGENDA_STATUS_URL, or add status_url to config.toml)",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_config() {
        let config = Config {
            status_url: Some(Url::parse("https://config.example.com/status").unwrap()),
            ..Config::default()
        };
        let flag = Url::parse("https://flag.example.com/status").unwrap();
        assert_eq!(resolve_status_url(Some(flag.clone()), &config).unwrap(), flag);
    }

    #[test]
    fn config_used_without_flag() {
        let url = Url::parse("https://config.example.com/status").unwrap();
        let config = Config {
            status_url: Some(url.clone()),
            ..Config::default()
        };
        assert_eq!(resolve_status_url(None, &config).unwrap(), url);
    }

    #[test]
    fn missing_endpoint_is_an_error() {
        let err = resolve_status_url(None, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("missing liveness endpoint"));
    }

    #[test]
    fn blank_event_id_is_rejected_before_any_request() {
        let mut output = Vec::new();
        let err = run(&mut output, "  ", None, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("invalid event ID"));
        assert!(output.is_empty());
    }
}
