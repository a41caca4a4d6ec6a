//! The [`NewsStore`] — owner of all persisted state.
//!
//! All reads and writes of participants, items, and approvals go through
//! this type. Other components only ever receive cloned snapshots.
//!
//! INVARIANT: every mutation holds the write lock across its whole
//! read-modify-write sequence *and* the write-through to disk, so no two
//! mutations interleave (counter allocation and the approval
//! scan-then-insert are check-then-act) and readers never observe a
//! half-applied state. Read-only operations share the read lock.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, error, info};

use newsdesk_core::ids::{ExternalId, ItemId, ParticipantId};
use newsdesk_core::model::{Approval, ApprovalOutcome, NewsItem, Participant};

use crate::errors::{PersistenceError, StoreError};
use crate::search;
use crate::state::StoreState;

/// A successfully applied mutation plus the fate of its write-through.
///
/// The write-through runs after the in-memory change and its failure does
/// not roll anything back: `value` is valid either way, and `persist`
/// carries the consistency warning the caller should surface ("this may
/// not survive a restart").
#[derive(Debug)]
pub struct Applied<T> {
    /// The result of the mutation (new id, approval outcome, ...).
    pub value: T,
    /// `Err` when the write-through to the state file failed.
    pub persist: Result<(), PersistenceError>,
}

impl<T> Applied<T> {
    fn new(value: T, persist: Result<(), PersistenceError>) -> Self {
        Self { value, persist }
    }
}

/// Durable mapping of participants, items, and approvals.
///
/// Backed by a single JSON state file replaced wholesale on every
/// mutation (write-through, last-writer-wins, single process).
pub struct NewsStore {
    path: PathBuf,
    state: RwLock<StoreState>,
    recovered: bool,
}

impl NewsStore {
    /// Open a store at `path`.
    ///
    /// Missing file: start empty with zeroed counters. Present but
    /// unreadable or malformed: log at error level and start empty —
    /// data loss on corruption is an accepted tradeoff at this scale, but
    /// it is never silent ([`Self::recovered_from_corruption`] reports it
    /// and the error log records it).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (state, recovered) = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StoreState>(&raw) {
                Ok(state) => {
                    debug!(
                        path = %path.display(),
                        participants = state.participants.len(),
                        items = state.items.len(),
                        approvals = state.approvals.len(),
                        "store state loaded"
                    );
                    (state, false)
                }
                Err(e) => {
                    error!(
                        path = %path.display(),
                        error = %e,
                        "state file is malformed; starting from empty state"
                    );
                    (StoreState::default(), true)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no state file; starting from empty state");
                (StoreState::default(), false)
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    "state file unreadable; starting from empty state"
                );
                (StoreState::default(), true)
            }
        };

        Self {
            path,
            state: RwLock::new(state),
            recovered,
        }
    }

    /// Path of the backing state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether startup discarded a corrupt state file.
    #[must_use]
    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Register a participant, idempotently.
    ///
    /// A known `external_id` returns its existing local id without any
    /// mutation or write. A new one allocates the next participant
    /// counter, appends the record, and persists.
    pub fn register_participant(&self, external_id: &ExternalId) -> Applied<ParticipantId> {
        let mut state = self.state.write();

        if let Some(existing) = lookup_participant(&state, external_id) {
            return Applied::new(existing, Ok(()));
        }

        let id = state.counters.next_participant();
        state.participants.push(Participant {
            id,
            external_id: external_id.clone(),
        });
        info!(participant_id = %id, external_id = %external_id, "participant registered");
        let persist = self.persist_locked(&state);
        Applied::new(id, persist)
    }

    /// Submit an item.
    ///
    /// Fails with an invalid-reference error when `author` is unknown;
    /// the item counter does not advance on failure.
    pub fn submit_item(
        &self,
        body: impl Into<String>,
        tags: Vec<String>,
        author: ParticipantId,
    ) -> Result<Applied<ItemId>, StoreError> {
        self.submit_item_at(body, tags, author, Utc::now())
    }

    /// Submit an item with an explicit `created_at`.
    ///
    /// Same contract as [`Self::submit_item`]; the timestamp seam exists
    /// for imports and deterministic tests.
    pub fn submit_item_at(
        &self,
        body: impl Into<String>,
        tags: Vec<String>,
        author: ParticipantId,
        created_at: DateTime<Utc>,
    ) -> Result<Applied<ItemId>, StoreError> {
        let mut state = self.state.write();

        // Author must resolve before the counter advances.
        if !state.participants.iter().any(|p| p.id == author) {
            return Err(StoreError::UnknownParticipant(author));
        }

        let id = state.counters.next_item();
        state.items.push(NewsItem {
            id,
            created_at,
            body: body.into(),
            tags,
            author,
        });
        info!(item_id = %id, author = %author, "item submitted");
        let persist = self.persist_locked(&state);
        Ok(Applied::new(id, persist))
    }

    /// Record an approval for `(participant, item)`.
    ///
    /// At most one approval exists per pair: a repeat returns
    /// [`ApprovalOutcome::AlreadyExists`] and changes nothing. Unknown ids
    /// fail with an invalid-reference error.
    pub fn record_approval(
        &self,
        participant: ParticipantId,
        item: ItemId,
    ) -> Result<Applied<ApprovalOutcome>, StoreError> {
        let mut state = self.state.write();

        if !state.participants.iter().any(|p| p.id == participant) {
            return Err(StoreError::UnknownParticipant(participant));
        }
        if !state.items.iter().any(|i| i.id == item) {
            return Err(StoreError::UnknownItem(item));
        }

        // Scan-then-insert; the held write lock makes the pair atomic
        // against concurrent in-process callers.
        if state
            .approvals
            .iter()
            .any(|a| a.participant == participant && a.item == item)
        {
            return Ok(Applied::new(ApprovalOutcome::AlreadyExists, Ok(())));
        }

        let id = state.counters.next_approval();
        state.approvals.push(Approval {
            id,
            participant,
            item,
        });
        debug!(approval_id = %id, participant = %participant, item = %item, "approval recorded");
        let persist = self.persist_locked(&state);
        Ok(Applied::new(ApprovalOutcome::Created, persist))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    /// Look up a participant's local id by external id.
    #[must_use]
    pub fn find_participant(&self, external_id: &ExternalId) -> Option<ParticipantId> {
        lookup_participant(&self.state.read(), external_id)
    }

    /// Fetch one item by id.
    #[must_use]
    pub fn get_item(&self, item: ItemId) -> Option<NewsItem> {
        self.state.read().items.iter().find(|i| i.id == item).cloned()
    }

    /// Number of approvals referencing `item`. Linear scan.
    #[must_use]
    pub fn count_approvals(&self, item: ItemId) -> usize {
        self.state
            .read()
            .approvals
            .iter()
            .filter(|a| a.item == item)
            .count()
    }

    /// All items whose `created_at` falls in `[start, end]` (both bounds
    /// inclusive), in insertion order.
    #[must_use]
    pub fn items_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<NewsItem> {
        self.state
            .read()
            .items
            .iter()
            .filter(|i| i.created_at >= start && i.created_at <= end)
            .cloned()
            .collect()
    }

    /// Snapshot of every registered participant, in registration order.
    #[must_use]
    pub fn all_participants(&self) -> Vec<Participant> {
        self.state.read().participants.clone()
    }

    /// Items matching any of `keywords` (see [`crate::search`]).
    #[must_use]
    pub fn search_by_keywords(&self, keywords: &[String]) -> Vec<NewsItem> {
        search::search_items(&self.state.read().items, keywords)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────

    /// Write-through: serialize the whole state and replace the file.
    ///
    /// Called with the write lock held so the on-disk document always
    /// reflects one consistent in-memory state.
    fn persist_locked(&self, state: &StoreState) -> Result<(), PersistenceError> {
        let fail = |reason: String| {
            error!(path = %self.path.display(), reason = %reason, "state write-through failed");
            PersistenceError {
                path: self.path.clone(),
                reason,
            }
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
        }

        let json = serde_json::to_vec_pretty(state).map_err(|e| fail(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| fail(e.to_string()))
    }
}

fn lookup_participant(state: &StoreState, external_id: &ExternalId) -> Option<ParticipantId> {
    state
        .participants
        .iter()
        .find(|p| &p.external_id == external_id)
        .map(|p| p.id)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
