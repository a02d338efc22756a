//! Core domain logic for the live agenda.
//!
//! This crate contains the fundamental types and logic for:
//! - Status: classifying sessions as upcoming, live, or ended
//! - Grouping: collecting parallel sessions into slots
//! - Redirects: deciding when to move a visitor to the next live session

pub mod agenda;
mod clock;
pub mod demo;
pub mod item;
pub mod page;
pub mod redirect;
pub mod slot;
pub mod status;
mod types;

pub use agenda::{Agenda, AgendaError, AgendaLoad, Rejected};
pub use clock::{Clock, DEFAULT_TICK};
pub use item::{ItemError, RawScheduleItem, RawTimestamp, ScheduleItem};
pub use redirect::{Directive, Liveness, RedirectEngine, RedirectPhase, RedirectState};
pub use slot::{ScheduleTimeline, Slot, group};
pub use status::{Classification, SessionStatus, classify, human_duration};
pub use types::{EventId, ValidationError};
