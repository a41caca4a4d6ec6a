//! Command dispatch over the store.
//!
//! One handler per inbound command, all funneling into store reads and
//! writes. Registration is implicit: every command first resolves (or
//! creates) the participant for the sender's external id, so a first
//! contact needs no separate signup step.

use std::sync::Arc;
use std::time::Duration;

use tracing::{instrument, warn};

use newsdesk_core::ids::{ExternalId, ParticipantId};
use newsdesk_core::model::ApprovalOutcome;
use newsdesk_store::{NewsStore, StoreError};

use crate::commands::{Command, CommandError, Reply, RouterResponse, SearchHit};
use crate::pending::{Advance, PendingSubmissions};

/// Routes parsed commands to store operations and builds replies.
pub struct CommandRouter {
    store: Arc<NewsStore>,
    pending: PendingSubmissions,
}

impl CommandRouter {
    /// Create a router over `store`; unfinished submission dialogs are
    /// dropped after `submission_ttl`.
    pub fn new(store: Arc<NewsStore>, submission_ttl: Duration) -> Self {
        Self {
            store,
            pending: PendingSubmissions::new(submission_ttl),
        }
    }

    /// Handle one command from the participant behind `external_id`.
    ///
    /// Always produces either a reply or a specific rejection; the
    /// transport renders both to text.
    #[instrument(skip(self, command), fields(external_id = %external_id))]
    pub fn handle(
        &self,
        external_id: &ExternalId,
        command: Command,
    ) -> Result<RouterResponse, CommandError> {
        // Implicit registration on every interaction.
        let registered = self.store.register_participant(external_id);
        let participant = registered.value;
        let mut persisted = registered.persist.is_ok();

        let reply = match command {
            Command::Register => Reply::Registered,
            Command::Help => Reply::Help,
            Command::BeginSubmission => {
                self.pending.begin(participant);
                Reply::AwaitingBody
            }
            Command::Text(text) => match self.pending.advance(participant, &text) {
                Advance::NotPending => Reply::Unrecognized,
                Advance::Expired => Reply::SubmissionExpired,
                Advance::PromptTags => Reply::AwaitingTags,
                Advance::Ready { body, tags } => {
                    self.submit(participant, body, tags, &mut persisted)?
                }
            },
            Command::Submit { body, tags } => {
                self.submit(participant, body, tags, &mut persisted)?
            }
            Command::Approve { item } => {
                let applied = self
                    .store
                    .record_approval(participant, item)
                    .map_err(store_error_to_command)?;
                persisted &= applied.persist.is_ok();
                match applied.value {
                    ApprovalOutcome::Created => Reply::Approved {
                        item,
                        approvals: self.store.count_approvals(item),
                    },
                    ApprovalOutcome::AlreadyExists => Reply::AlreadyApproved { item },
                }
            }
            Command::Search { keywords } => self.search(&keywords)?,
        };

        if !persisted {
            warn!(participant = %participant, "state change applied but not persisted");
        }
        Ok(RouterResponse { reply, persisted })
    }

    fn submit(
        &self,
        author: ParticipantId,
        body: String,
        tags: Vec<String>,
        persisted: &mut bool,
    ) -> Result<Reply, CommandError> {
        if body.trim().is_empty() {
            return Err(CommandError::MissingField { field: "news text" });
        }

        let applied = self
            .store
            .submit_item(body, tags.clone(), author)
            .map_err(store_error_to_command)?;
        *persisted &= applied.persist.is_ok();
        Ok(Reply::ItemAdded {
            item: applied.value,
            tags,
        })
    }

    fn search(&self, keywords: &[String]) -> Result<Reply, CommandError> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(CommandError::MissingField { field: "keywords" });
        }

        let matches = self.store.search_by_keywords(&keywords);
        if matches.is_empty() {
            return Ok(Reply::NoMatches { keywords });
        }

        let hits = matches
            .into_iter()
            .map(|item| SearchHit {
                approvals: self.store.count_approvals(item.id),
                item,
            })
            .collect();
        Ok(Reply::SearchResults { keywords, hits })
    }
}

fn store_error_to_command(e: StoreError) -> CommandError {
    match e {
        StoreError::UnknownItem(id) => CommandError::UnknownItem(id),
        StoreError::UnknownParticipant(id) => CommandError::UnknownParticipant(id),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
