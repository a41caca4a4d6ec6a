//! # newsdesk-server
//!
//! The command layer between the messaging transport and the store:
//! parsed [`commands::Command`] values go in, typed
//! [`commands::Reply`]/[`commands::CommandError`] values come out, and the
//! transport renders them to user-facing text. Also owns the
//! per-participant pending-submission dialog state.

#![deny(unsafe_code)]

pub mod commands;
pub mod pending;
pub mod router;

pub use commands::{Command, CommandError, Reply, RouterResponse, SearchHit};
pub use pending::{Advance, PendingSubmissions, parse_tags};
pub use router::CommandRouter;
