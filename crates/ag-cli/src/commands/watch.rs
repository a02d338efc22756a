//! Watch command: follows a visitor's page and redirects when its session ends.

use std::io::Write;
use std::path::Path;

use ag_core::{RedirectEngine, ScheduleItem};
use ag_live::{DriverOutcome, Navigator, RedirectDriver, StatusClient};
use anyhow::{Context, Result};
use url::Url;

use crate::Config;
use crate::commands::status::resolve_status_url;
use crate::commands::util::load_agenda;

/// Prints navigations instead of performing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, url: &Url) {
        println!("{}", redirect_line(url));
    }

    fn offer_choices(&self, choices: &[&ScheduleItem]) {
        print!("{}", choices_text(choices));
    }
}

fn redirect_line(url: &Url) -> String {
    format!("redirect: {url}")
}

fn choices_text(choices: &[&ScheduleItem]) -> String {
    let mut text = String::from("Several sessions are live, choose one:\n");
    for item in choices {
        text.push_str(&format!("  - {}: {}\n", item.title(), item.url()));
    }
    text
}

pub fn run<W: Write>(
    writer: &mut W,
    agenda_path: &Path,
    page: Url,
    status_url: Option<Url>,
    config: &Config,
) -> Result<()> {
    let load = load_agenda(agenda_path)?;
    let engine = RedirectEngine::new(load.agenda, page);

    let Some(current) = engine.current_item() else {
        writeln!(
            writer,
            "{} matches no scheduled session; nothing to follow.",
            engine.page_url()
        )?;
        return Ok(());
    };
    writeln!(
        writer,
        "Following {} ({}) on {}",
        current.title(),
        current.event_id(),
        engine.page_url()
    )?;
    writer.flush()?;

    let settings = config.driver_settings();
    let client = StatusClient::new(resolve_status_url(status_url, config)?, settings.poll_timeout)
        .context("failed to create status client")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let outcome = runtime.block_on(async {
        let handle = RedirectDriver::new(engine, client, PrintNavigator, settings).start();
        handle
            .run_until(async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %err, "failed to listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
            })
            .await
    })?;

    match outcome {
        DriverOutcome::Redirected(url) => tracing::info!(%url, "visitor redirected"),
        DriverOutcome::Stopped => writeln!(writer, "Stopped.")?,
    }
    Ok(())
}
