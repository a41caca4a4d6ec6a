//! Digest message rendering.
//!
//! One message text is built per cycle and fanned out unchanged to every
//! participant: a dated header, an item count, then per item its id,
//! local time-of-day, approval count, tags, and a truncated body.

use chrono::NaiveDate;

use newsdesk_core::model::NewsItem;
use newsdesk_core::text::{DIGEST_BODY_BUDGET, excerpt};

/// One item prepared for rendering.
#[derive(Clone, Debug)]
pub struct DigestEntry {
    /// The item itself.
    pub item: NewsItem,
    /// `HH:MM` in the digest's local zone.
    pub local_time: String,
    /// Approval count at render time.
    pub approvals: usize,
}

/// Render the digest for `date` over the prepared entries.
///
/// Callers skip rendering entirely when there are no entries; an empty
/// digest is never sent.
#[must_use]
pub fn digest_message(date: NaiveDate, entries: &[DigestEntry]) -> String {
    let mut out = format!("📰 Daily News Digest - {date}\n\n");
    out.push_str(&format!(
        "Found {} news item(s) from yesterday:\n\n",
        entries.len()
    ));

    for entry in entries {
        out.push_str(&format!("📄 News #{} ({})\n", entry.item.id, entry.local_time));
        out.push_str(&format!("👍 {} likes\n", entry.approvals));
        out.push_str(&format!("🏷️ Tags: {}\n", entry.item.tags.join(", ")));
        out.push_str(&format!(
            "📝 {}\n\n",
            excerpt(&entry.item.body, DIGEST_BODY_BUDGET)
        ));
    }

    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
