//! Per-participant pending-submission sessions.
//!
//! The two-step submission dialog (`/add_news` → body text → tag text) is
//! an explicit state machine keyed by participant, with a TTL so abandoned
//! dialogs do not accumulate. Stale entries are dropped on access.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use newsdesk_core::ids::ParticipantId;

/// Where a pending submission stands.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Stage {
    /// Waiting for the item body.
    AwaitingBody,
    /// Body captured; waiting for the tag line.
    AwaitingTags {
        /// The captured body.
        body: String,
    },
}

struct Entry {
    stage: Stage,
    updated_at: Instant,
}

/// What feeding one line of free text into the machine produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// No pending submission for this participant.
    NotPending,
    /// The pending submission was stale and has been dropped.
    Expired,
    /// Body captured; the caller should prompt for tags.
    PromptTags,
    /// Dialog complete; submit with these values.
    Ready {
        /// Item body.
        body: String,
        /// Parsed tags (trimmed, empties removed, order preserved).
        tags: Vec<String>,
    },
}

/// All in-flight submission dialogs.
pub struct PendingSubmissions {
    ttl: Duration,
    entries: Mutex<HashMap<ParticipantId, Entry>>,
}

impl PendingSubmissions {
    /// Create with the given per-entry time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Start (or restart) a dialog for `participant`.
    pub fn begin(&self, participant: ParticipantId) {
        let _ = self.entries.lock().insert(
            participant,
            Entry {
                stage: Stage::AwaitingBody,
                updated_at: Instant::now(),
            },
        );
    }

    /// Feed one line of free text into `participant`'s dialog.
    pub fn advance(&self, participant: ParticipantId, text: &str) -> Advance {
        let mut entries = self.entries.lock();

        let Some(entry) = entries.remove(&participant) else {
            return Advance::NotPending;
        };
        if entry.updated_at.elapsed() > self.ttl {
            return Advance::Expired;
        }

        match entry.stage {
            Stage::AwaitingBody => {
                let _ = entries.insert(
                    participant,
                    Entry {
                        stage: Stage::AwaitingTags {
                            body: text.to_string(),
                        },
                        updated_at: Instant::now(),
                    },
                );
                Advance::PromptTags
            }
            Stage::AwaitingTags { body } => Advance::Ready {
                body,
                tags: parse_tags(text),
            },
        }
    }

    /// Drop any dialog for `participant`. Returns whether one existed.
    pub fn cancel(&self, participant: ParticipantId) -> bool {
        self.entries.lock().remove(&participant).is_some()
    }
}

/// Split a comma-separated tag line, trimming and dropping empties while
/// preserving order (and duplicates — they are allowed on items).
#[must_use]
pub fn parse_tags(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
