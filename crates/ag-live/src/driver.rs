//! Runs a [`RedirectEngine`] against the clock and the liveness endpoint.
//!
//! One task per page owns the engine. It wakes on clock ticks, on the poll
//! interval while the engine awaits end confirmation, and on stop. Stopping
//! cancels the ticker and any in-flight poll before the task returns, so no
//! redirect can fire after teardown.

use std::pin::Pin;
use std::time::Duration;

use ag_core::{Directive, EventId, Liveness, RedirectEngine, ScheduleItem};
use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use url::Url;

use crate::LiveError;
use crate::client::{DEFAULT_TIMEOUT, LivenessSource};
use crate::ticker::Ticker;

/// Default liveness poll cadence while awaiting end confirmation.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Timing knobs for the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    pub tick_interval: Duration,
    pub poll_interval: Duration,
    /// Upper bound on a single poll request.
    pub poll_timeout: Duration,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            tick_interval: ag_core::DEFAULT_TICK,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Performs the navigation side effect.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, url: &Url);

    /// Offers a manual choice when several sessions are live at once.
    fn offer_choices(&self, _choices: &[&ScheduleItem]) {}
}

/// How a driver task finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverOutcome {
    Redirected(Url),
    Stopped,
}

/// Owns the engine and its collaborators until started.
#[derive(Debug)]
pub struct RedirectDriver<S, N> {
    engine: RedirectEngine,
    source: S,
    navigator: N,
    settings: DriverSettings,
    started_at: Option<DateTime<Utc>>,
}

impl<S: LivenessSource, N: Navigator> RedirectDriver<S, N> {
    pub fn new(engine: RedirectEngine, source: S, navigator: N, settings: DriverSettings) -> Self {
        Self {
            engine,
            source,
            navigator,
            settings,
            started_at: None,
        }
    }

    /// Pins the clock's capture time instead of reading the system clock.
    #[must_use]
    pub fn starting_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// Spawns the driver task. Must be called within a tokio runtime.
    pub fn start(self) -> DriverHandle {
        let started_at = self.started_at.unwrap_or_else(Utc::now);
        let ticker = Ticker::new(started_at, self.settings.tick_interval);
        let now = ticker.subscribe();
        let (stop_tx, stop_rx) = oneshot::channel();

        tracing::debug!(
            page = %self.engine.page_url(),
            %started_at,
            "starting redirect driver"
        );
        let task = tokio::spawn(run(
            self.engine,
            self.source,
            self.navigator,
            ticker,
            self.settings,
            stop_rx,
        ));

        DriverHandle {
            stop: Some(stop_tx),
            task,
            now,
        }
    }
}

/// Handle to a running driver. Dropping it stops the driver.
#[derive(Debug)]
pub struct DriverHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<DriverOutcome>,
    now: watch::Receiver<DateTime<Utc>>,
}

impl DriverHandle {
    /// The page's shared "now", updated on every tick.
    pub fn clock(&self) -> watch::Receiver<DateTime<Utc>> {
        self.now.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the driver and waits for its task to exit.
    pub async fn stop(mut self) -> Result<DriverOutcome, LiveError> {
        if let Some(stop) = self.stop.take() {
            // The task may already have finished after redirecting.
            let _ = stop.send(());
        }
        Ok((&mut self.task).await?)
    }

    /// Waits until the driver redirects, or stops it once `shutdown` resolves.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<DriverOutcome, LiveError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            outcome = &mut self.task => Ok(outcome?),
            () = shutdown => self.stop().await,
        }
    }
}

/// A liveness request running alongside the clock.
type InFlight<'a> = Pin<Box<dyn Future<Output = Liveness> + Send + 'a>>;

async fn run<S: LivenessSource, N: Navigator>(
    mut engine: RedirectEngine,
    source: S,
    navigator: N,
    mut ticker: Ticker,
    settings: DriverSettings,
    mut stop: oneshot::Receiver<()>,
) -> DriverOutcome {
    let mut poll_timer = tokio::time::interval(settings.poll_interval);
    poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut polling: Option<EventId> = None;
    let mut in_flight: Option<InFlight<'_>> = None;

    loop {
        let directive = tokio::select! {
            biased;
            _ = &mut stop => {
                tracing::debug!(
                    phase = %engine.phase(),
                    poll_in_flight = in_flight.is_some(),
                    "redirect driver stopped"
                );
                return DriverOutcome::Stopped;
            }
            now = ticker.tick() => engine.on_tick(now),
            liveness = settle(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
                engine.on_poll(ticker.refresh(), liveness)
            }
            _ = poll_timer.tick(), if polling.is_some() && in_flight.is_none() => {
                if let Some(event_id) = polling.clone() {
                    in_flight = Some(Box::pin(poll_once(&source, event_id, settings.poll_timeout)));
                }
                continue;
            }
        };

        match directive {
            Directive::Stay | Directive::KeepPolling => {}
            Directive::StartPolling(event_id) => {
                in_flight = None;
                poll_timer.reset_immediately();
                polling = Some(event_id);
            }
            Directive::StopPolling => {
                polling = None;
                in_flight = None;
                let choices = engine.manual_choices(ticker.now());
                if !choices.is_empty() {
                    navigator.offer_choices(&choices);
                }
            }
            Directive::Navigate(url) => {
                navigator.navigate(&url);
                return DriverOutcome::Redirected(url);
            }
        }
    }
}

/// Resolves with the in-flight poll's result, or never when idle.
async fn settle(in_flight: &mut Option<InFlight<'_>>) -> Liveness {
    match in_flight {
        Some(poll) => poll.as_mut().await,
        None => std::future::pending().await,
    }
}

async fn poll_once<S: LivenessSource>(
    source: &S,
    event_id: EventId,
    timeout: Duration,
) -> Liveness {
    match tokio::time::timeout(timeout, source.is_stream_live(&event_id)).await {
        Ok(Ok(is_live)) => {
            tracing::debug!(%event_id, is_live, "stream status");
            Liveness::from(is_live)
        }
        Ok(Err(err)) => {
            tracing::warn!(%event_id, error = %err, "stream status poll failed");
            Liveness::Unknown
        }
        Err(_) => {
            tracing::warn!(%event_id, ?timeout, "stream status poll timed out");
            Liveness::Unknown
        }
    }
}
