//! Persisted domain types.
//!
//! All three entity types are immutable once created: there is no edit or
//! delete operation anywhere in the system. The store appends records and
//! allocates ids from persisted counters; nothing else may construct
//! entities that end up in durable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ApprovalId, ExternalId, ItemId, ParticipantId};

/// A registered external identity mapped to a local integer id.
///
/// Created on first interaction, never mutated, never deleted.
/// `external_id` is unique across all participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Local monotonic id.
    pub id: ParticipantId,
    /// Opaque transport-supplied identifier.
    pub external_id: ExternalId,
}

/// A submitted text item with free-form tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Local monotonic id.
    pub id: ItemId,
    /// Submission time, UTC.
    pub created_at: DateTime<Utc>,
    /// Item text.
    pub body: String,
    /// Tags in insertion order. Duplicates are allowed.
    pub tags: Vec<String>,
    /// Submitting participant. Always references an existing participant.
    pub author: ParticipantId,
}

/// One participant's endorsement of one item.
///
/// At most one approval exists per `(participant, item)` pair — the store
/// enforces the deduplication invariant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    /// Local monotonic id.
    pub id: ApprovalId,
    /// Approving participant.
    pub participant: ParticipantId,
    /// Approved item.
    pub item: ItemId,
}

/// Outcome of recording an approval.
///
/// `AlreadyExists` is a normal no-op outcome, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// A new approval record was created.
    Created,
    /// The pair was already approved; nothing changed.
    AlreadyExists,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn news_item_serializes_camel_case() {
        let item = NewsItem {
            id: ItemId(3),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            body: "release shipped".into(),
            tags: vec!["release".into(), "Release".into()],
            author: ParticipantId(1),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["createdAt"], "2024-01-01T10:00:00Z");
        assert_eq!(json["author"], 1);
        // Duplicate tags survive serialization in order.
        assert_eq!(json["tags"][0], "release");
        assert_eq!(json["tags"][1], "Release");
    }

    #[test]
    fn participant_round_trip() {
        let p = Participant {
            id: ParticipantId(5),
            external_id: ExternalId::new("ext-5"),
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: Participant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
