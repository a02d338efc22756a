//! The ticking clock source shared by the page.

use std::time::Duration;

use ag_core::Clock;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Advances a [`Clock`] on a fixed interval and publishes each new "now".
///
/// Wall time is derived from the capture time plus monotonic elapsed time, so
/// a wall-clock jump on the host never reaches the schedule.
#[derive(Debug)]
pub struct Ticker {
    clock: Clock,
    origin: Instant,
    interval: Interval,
    tx: watch::Sender<DateTime<Utc>>,
}

impl Ticker {
    /// Creates a ticker whose clock reads `started_at` now.
    ///
    /// The first tick completes immediately.
    pub fn new(started_at: DateTime<Utc>, period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let (tx, _rx) = watch::channel(started_at);
        Self {
            clock: Clock::starting_at(started_at),
            origin: Instant::now(),
            interval,
            tx,
        }
    }

    /// Waits for the next tick and returns the advanced time.
    pub async fn tick(&mut self) -> DateTime<Utc> {
        self.interval.tick().await;
        self.refresh()
    }

    /// Advances the clock to the current sample without waiting.
    pub fn refresh(&mut self) -> DateTime<Utc> {
        let now = self.clock.advance_to(self.sample());
        self.tx.send_replace(now);
        now
    }

    pub const fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// A receiver that observes every published "now".
    pub fn subscribe(&self) -> watch::Receiver<DateTime<Utc>> {
        self.tx.subscribe()
    }

    fn sample(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed()).unwrap_or_default();
        self.clock.started_at() + elapsed
    }
}
