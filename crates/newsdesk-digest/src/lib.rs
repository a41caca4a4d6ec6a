//! # newsdesk-digest
//!
//! The daily digest: once per day at a configured local time, summarize
//! the prior local calendar day's items and fan the summary out to every
//! participant through the messaging gateway.
//!
//! - [`zone::DigestZone`] — named IANA zone or fixed offset
//! - [`schedule`] — pure fire-time and window arithmetic
//! - [`format`] — digest message rendering
//! - [`scheduler::DigestScheduler`] — the `Idle`/`Firing` loop

#![deny(unsafe_code)]

pub mod format;
pub mod schedule;
pub mod scheduler;
pub mod zone;

pub use schedule::{DigestWindow, ScheduleError, next_fire, yesterday_window};
pub use scheduler::{CycleReport, DigestConfig, DigestScheduler, SchedulerState};
pub use zone::{DigestZone, ZoneParseError};
