//! The transport seam.
//!
//! The chat transport (message delivery, command parsing, credentials) is
//! an external collaborator. The core only ever talks to it through
//! [`MessageGateway`], so the digest fan-out and command replies are
//! testable against an in-memory fake.

use async_trait::async_trait;

use crate::ids::ExternalId;

/// Why a delivery failed.
///
/// The digest fan-out only needs success/failure to decide logging, but
/// the classification lets callers distinguish a dead recipient from a
/// retryable transport hiccup.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The recipient cannot receive messages (blocked the bot, deleted
    /// account, unknown chat).
    #[error("recipient {recipient} unreachable: {reason}")]
    Unreachable {
        /// The recipient that could not be reached.
        recipient: ExternalId,
        /// Transport-supplied description.
        reason: String,
    },
    /// A transient transport failure; a later attempt may succeed.
    #[error("transient delivery failure: {reason}")]
    Transient {
        /// Transport-supplied description.
        reason: String,
    },
}

/// Outbound text delivery to a single participant.
///
/// Implemented by the transport layer; consumed by the digest fan-out and
/// the command reply path.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Deliver `text` to the participant identified by `recipient`.
    async fn send_text(&self, recipient: &ExternalId, text: &str) -> Result<(), DeliveryError>;
}
