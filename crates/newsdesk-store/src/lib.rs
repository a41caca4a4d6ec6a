//! # newsdesk-store
//!
//! The durable store at the heart of Newsdesk: participants, items, and
//! approvals behind one mutation-serialized [`store::NewsStore`], persisted
//! as a single JSON document with write-through on every change, plus the
//! keyword [`search`] over the item collection.

#![deny(unsafe_code)]

pub mod errors;
pub mod search;
pub mod state;
pub mod store;

pub use errors::{PersistenceError, StoreError};
pub use state::{Counters, StoreState};
pub use store::{Applied, NewsStore};
