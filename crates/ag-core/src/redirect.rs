//! Redirect decisions for a visitor watching a scheduled session.
//!
//! The engine moves a visitor to the next live session once their own session
//! has ended, and only when:
//!
//! 1. the visitor was on the page while its item was scheduled (sticky),
//! 2. no item on the page is scheduled any more,
//! 3. the liveness poll confirmed the stream is no longer broadcasting, and
//! 4. exactly one item on another page is scheduled for now.
//!
//! A visitor who arrives outside their page's window is never redirected.
//! Failed polls never confirm the end, so the visitor stays put.
//!
//! The engine is a pure state machine. Callers feed it clock ticks and poll
//! results and act on the returned [`Directive`].

use std::fmt;

use chrono::{DateTime, Utc};
use url::Url;

use crate::agenda::Agenda;
use crate::item::ScheduleItem;
use crate::page::{carry_query, same_page};
use crate::types::EventId;

/// Coarse position of the engine in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectPhase {
    /// The visitor has not been seen on the page during its window.
    Idle,
    /// The visitor was on the page while it was live.
    ConfirmedPresentWhileLive,
    /// The page's window ended; waiting for the stream to confirm it ended.
    AwaitingEndConfirmation,
    /// Navigation was issued. Terminal.
    Redirecting,
}

impl RedirectPhase {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ConfirmedPresentWhileLive => "confirmed_present_while_live",
            Self::AwaitingEndConfirmation => "awaiting_end_confirmation",
            Self::Redirecting => "redirecting",
        }
    }
}

impl fmt::Display for RedirectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutable flags behind [`RedirectPhase`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedirectState {
    /// Sticky: once true, never resets.
    pub has_been_on_page_while_scheduled: bool,
    pub waiting_to_redirect: bool,
    /// `Some(true)` once a poll confirmed the stream ended.
    pub confirmed_stream_ended: Option<bool>,
}

/// Result of one liveness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Live,
    Ended,
    /// The poll failed or timed out. Never confirms the end.
    Unknown,
}

impl From<bool> for Liveness {
    fn from(is_stream_live: bool) -> Self {
        if is_stream_live { Self::Live } else { Self::Ended }
    }
}

/// What the caller should do after feeding the engine an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Stay,
    /// Begin polling the liveness endpoint for this event.
    StartPolling(EventId),
    KeepPolling,
    StopPolling,
    /// Navigate the visitor here. Issued at most once.
    Navigate(Url),
}

/// Per-page redirect state machine.
#[derive(Debug, Clone)]
pub struct RedirectEngine {
    agenda: Agenda,
    page_url: Url,
    /// Every item whose URL addresses the page, in timeline order.
    page_items: Vec<ScheduleItem>,
    /// The page item most recently seen on air.
    watching: Option<ScheduleItem>,
    state: RedirectState,
    redirected_to: Option<Url>,
}

impl RedirectEngine {
    /// Creates an engine for the visitor's page.
    ///
    /// Several items may share the page's URL, as when one stage hosts
    /// back-to-back sessions. Presence is checked against all of them.
    pub fn new(agenda: Agenda, page_url: Url) -> Self {
        let page_items: Vec<ScheduleItem> = agenda
            .items()
            .filter(|item| same_page(item.url(), &page_url))
            .cloned()
            .collect();

        match page_items.first() {
            Some(item) => tracing::debug!(
                page = %page_url,
                event_id = %item.event_id(),
                title = item.title(),
                matches = page_items.len(),
                "page matches scheduled item"
            ),
            None => tracing::debug!(page = %page_url, "page matches no scheduled item"),
        }

        Self {
            agenda,
            page_url,
            page_items,
            watching: None,
            state: RedirectState::default(),
            redirected_to: None,
        }
    }

    pub const fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub const fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// The page item the visitor was last seen watching, or else the first
    /// item whose URL matches the page.
    pub fn current_item(&self) -> Option<&ScheduleItem> {
        self.watching.as_ref().or_else(|| self.page_items.first())
    }

    /// All items sharing the page's URL.
    pub fn page_items(&self) -> &[ScheduleItem] {
        &self.page_items
    }

    pub const fn state(&self) -> RedirectState {
        self.state
    }

    pub const fn redirected_to(&self) -> Option<&Url> {
        self.redirected_to.as_ref()
    }

    pub const fn phase(&self) -> RedirectPhase {
        if self.redirected_to.is_some() {
            RedirectPhase::Redirecting
        } else if self.state.waiting_to_redirect {
            RedirectPhase::AwaitingEndConfirmation
        } else if self.state.has_been_on_page_while_scheduled {
            RedirectPhase::ConfirmedPresentWhileLive
        } else {
            RedirectPhase::Idle
        }
    }

    /// Re-evaluates the schedule at `now`.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Directive {
        if self.redirected_to.is_some() || self.page_items.is_empty() {
            return Directive::Stay;
        }

        if let Some(on_air) = self.on_air(now) {
            return self.observe_on_air(on_air, now);
        }

        if !self.state.has_been_on_page_while_scheduled {
            return Directive::Stay;
        }
        let Some(watched) = &self.watching else {
            return Directive::Stay;
        };

        if !self.state.waiting_to_redirect {
            self.state.waiting_to_redirect = true;
            let event_id = watched.event_id().clone();
            tracing::info!(%event_id, %now, "scheduled window ended, confirming stream end");
            return Directive::StartPolling(event_id);
        }

        if self.state.confirmed_stream_ended == Some(true) {
            return self.try_redirect(now);
        }

        Directive::Stay
    }

    /// Applies a liveness poll result observed at `now`.
    pub fn on_poll(&mut self, now: DateTime<Utc>, liveness: Liveness) -> Directive {
        if !self.state.waiting_to_redirect
            || self.redirected_to.is_some()
            || self.state.confirmed_stream_ended == Some(true)
        {
            return Directive::StopPolling;
        }

        match liveness {
            Liveness::Live => {
                self.state.confirmed_stream_ended = Some(false);
                Directive::KeepPolling
            }
            Liveness::Unknown => Directive::KeepPolling,
            Liveness::Ended => {
                self.state.confirmed_stream_ended = Some(true);
                tracing::info!(%now, "stream end confirmed");
                match self.try_redirect(now) {
                    Directive::Navigate(url) => Directive::Navigate(url),
                    _ => Directive::StopPolling,
                }
            }
        }
    }

    /// Items the visitor could pick by hand when the automatic redirect is
    /// withheld because several sessions are live at once.
    pub fn manual_choices(&self, now: DateTime<Utc>) -> Vec<&ScheduleItem> {
        if self.redirected_to.is_some() || self.state.confirmed_stream_ended != Some(true) {
            return Vec::new();
        }
        let candidates = self.candidates(now);
        if candidates.len() > 1 {
            candidates
        } else {
            Vec::new()
        }
    }

    /// The first page item scheduled at `now`.
    fn on_air(&self, now: DateTime<Utc>) -> Option<ScheduleItem> {
        self.agenda
            .scheduled_at(now)
            .into_iter()
            .find(|item| same_page(item.url(), &self.page_url))
            .cloned()
    }

    fn observe_on_air(&mut self, item: ScheduleItem, now: DateTime<Utc>) -> Directive {
        if !self.state.has_been_on_page_while_scheduled {
            self.state.has_been_on_page_while_scheduled = true;
            tracing::info!(
                event_id = %item.event_id(),
                phase = %self.phase(),
                "visitor present while session is live"
            );
        }

        // The page went back on air before a redirect fired.
        let resumed = self.state.waiting_to_redirect;
        if resumed {
            self.state.waiting_to_redirect = false;
            self.state.confirmed_stream_ended = None;
            tracing::info!(
                event_id = %item.event_id(),
                %now,
                "page is live again, dropping end confirmation"
            );
        }

        if self.watching.as_ref() != Some(&item) {
            tracing::debug!(event_id = %item.event_id(), "watching page item");
            self.watching = Some(item);
        }

        if resumed {
            Directive::StopPolling
        } else {
            Directive::Stay
        }
    }

    /// Scheduled items on other pages.
    fn candidates(&self, now: DateTime<Utc>) -> Vec<&ScheduleItem> {
        self.agenda
            .scheduled_at(now)
            .into_iter()
            .filter(|item| !same_page(item.url(), &self.page_url))
            .collect()
    }

    fn try_redirect(&mut self, now: DateTime<Utc>) -> Directive {
        if self.on_air(now).is_some() {
            return Directive::Stay;
        }
        let candidates = self.candidates(now);
        let [target] = candidates.as_slice() else {
            tracing::debug!(
                candidates = candidates.len(),
                "no single redirect target, staying"
            );
            return Directive::Stay;
        };

        let url = carry_query(target.url(), &self.page_url);
        tracing::info!(
            to = %url,
            event_id = %target.event_id(),
            "redirecting to live session"
        );
        self.redirected_to = Some(url.clone());
        Directive::Navigate(url)
    }
}
