//! The persisted state document.
//!
//! The whole store is one JSON document: three entity arrays plus the
//! three id counters, replaced wholesale on every write. There is no
//! partial update or append-only log.

use serde::{Deserialize, Serialize};

use newsdesk_core::ids::{ApprovalId, ItemId, ParticipantId};
use newsdesk_core::model::{Approval, NewsItem, Participant};

/// Monotonic id counters, one per entity kind.
///
/// Each allocation reads-then-increments. Counters persist alongside the
/// entities and are never reset, so ids are never reused across process
/// restarts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Counters {
    /// Last allocated participant id.
    pub participant: u64,
    /// Last allocated item id.
    pub item: u64,
    /// Last allocated approval id.
    pub approval: u64,
}

impl Counters {
    pub(crate) fn next_participant(&mut self) -> ParticipantId {
        self.participant += 1;
        ParticipantId(self.participant)
    }

    pub(crate) fn next_item(&mut self) -> ItemId {
        self.item += 1;
        ItemId(self.item)
    }

    pub(crate) fn next_approval(&mut self) -> ApprovalId {
        self.approval += 1;
        ApprovalId(self.approval)
    }
}

/// The full persisted store state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreState {
    /// Registered participants, in registration order.
    pub participants: Vec<Participant>,
    /// Submitted items, in submission order.
    pub items: Vec<NewsItem>,
    /// Recorded approvals, in approval order.
    pub approvals: Vec<Approval>,
    /// Id counters.
    pub counters: Counters,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
