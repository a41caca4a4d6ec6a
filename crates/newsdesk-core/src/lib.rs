//! # newsdesk-core
//!
//! Foundation types and utilities shared by all Newsdesk crates:
//!
//! - **Branded ids**: [`ids::ParticipantId`], [`ids::ItemId`],
//!   [`ids::ApprovalId`] as integer newtypes, [`ids::ExternalId`] for the
//!   opaque transport-supplied identifier
//! - **Domain model**: [`model::Participant`], [`model::NewsItem`],
//!   [`model::Approval`]
//! - **Gateway seam**: [`gateway::MessageGateway`] — the narrow interface
//!   the core calls to deliver text to participants
//! - **Text**: [`text`] truncation helpers for display budgets
//!
//! ## Crate position
//!
//! Foundation crate. Depended on by all other newsdesk crates.

#![deny(unsafe_code)]

pub mod gateway;
pub mod ids;
pub mod model;
pub mod text;
