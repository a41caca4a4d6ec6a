//! Parsed inbound commands and their typed replies.
//!
//! The transport parses user input into [`Command`] values; the router
//! answers with a [`Reply`] (or [`CommandError`]) which renders to the
//! user-facing text at the gateway boundary. Every rejected operation has
//! a short, specific reason — no request goes unanswered.

use chrono::{DateTime, Utc};

use newsdesk_core::ids::{ItemId, ParticipantId};
use newsdesk_core::model::NewsItem;
use newsdesk_core::text::{SEARCH_BODY_BUDGET, excerpt};

/// Search replies show at most this many items; the rest is a count.
pub const SEARCH_DISPLAY_LIMIT: usize = 10;

/// A parsed inbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Explicit registration (`/start`).
    Register,
    /// Usage overview (`/help`).
    Help,
    /// Start the two-step submission dialog (`/add_news`).
    BeginSubmission,
    /// One-shot submission with body and tags already supplied.
    Submit {
        /// Item text.
        body: String,
        /// Free-form tags.
        tags: Vec<String>,
    },
    /// Approve an item (`/like_news <id>`).
    Approve {
        /// The item to approve.
        item: ItemId,
    },
    /// Keyword search (`/get_news <kw, kw>`).
    Search {
        /// Raw keywords; the router trims and validates.
        keywords: Vec<String>,
    },
    /// Free text outside any command; feeds the pending-submission dialog.
    Text(String),
}

/// One search hit prepared for rendering.
#[derive(Clone, Debug)]
pub struct SearchHit {
    /// The matched item.
    pub item: NewsItem,
    /// Approval count at reply time.
    pub approvals: usize,
}

/// A successful command outcome.
#[derive(Clone, Debug)]
pub enum Reply {
    /// Participant registered (or already known).
    Registered,
    /// Usage overview.
    Help,
    /// Submission dialog started; waiting for the body text.
    AwaitingBody,
    /// Body received; waiting for the tags.
    AwaitingTags,
    /// The pending submission expired before completion.
    SubmissionExpired,
    /// Item stored.
    ItemAdded {
        /// New item id.
        item: ItemId,
        /// Tags as stored.
        tags: Vec<String>,
    },
    /// Approval recorded.
    Approved {
        /// Approved item.
        item: ItemId,
        /// Total approvals after this one.
        approvals: usize,
    },
    /// The pair was already approved; nothing changed.
    AlreadyApproved {
        /// The item in question.
        item: ItemId,
    },
    /// Search matched at least one item.
    SearchResults {
        /// The (trimmed) keywords searched for.
        keywords: Vec<String>,
        /// All matches, oldest first.
        hits: Vec<SearchHit>,
    },
    /// Search matched nothing.
    NoMatches {
        /// The (trimmed) keywords searched for.
        keywords: Vec<String>,
    },
    /// Free text arrived outside any dialog.
    Unrecognized,
}

/// A rejected command, with a user-facing reason.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The referenced item does not exist.
    #[error("news item {0} not found")]
    UnknownItem(ItemId),
    /// The referenced participant does not exist. Registration is
    /// implicit, so this indicates store corruption rather than user error.
    #[error("participant {0} not registered")]
    UnknownParticipant(ParticipantId),
    /// A required field is empty or missing.
    #[error("missing required {field}")]
    MissingField {
        /// Which field.
        field: &'static str,
    },
}

impl CommandError {
    /// Short user-facing rejection text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownItem(id) => format!("❌ News with ID {id} not found."),
            Self::UnknownParticipant(_) => {
                "❌ You are not registered. Send /start first.".to_string()
            }
            Self::MissingField { field } => format!("❌ Please provide {field}."),
        }
    }
}

/// Reply plus the fate of any write-through it triggered.
#[derive(Debug)]
pub struct RouterResponse {
    /// What to tell the user.
    pub reply: Reply,
    /// `false` when a mutation applied in memory but failed to persist.
    pub persisted: bool,
}

impl RouterResponse {
    /// Render the full user-facing message, including the consistency
    /// warning when the write-through failed.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = self.reply.render();
        if !self.persisted {
            text.push_str("\n⚠️ Saved in memory, but writing to disk failed; this may not survive a restart.");
        }
        text
    }
}

impl Reply {
    /// User-facing text for this reply.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Registered => "🤖 Welcome to Newsdesk!\n\n\
                /add_news - add a news item with tags\n\
                /like_news <id> - like a news item\n\
                /get_news <keywords> - search news by keywords\n\
                /help - show detailed help\n\n\
                A daily digest of yesterday's news arrives every morning."
                .to_string(),
            Self::Help => "📖 Newsdesk commands:\n\n\
                /add_news - add a news item. The bot asks for the text, \
                then for comma-separated tags.\n\
                /like_news <id> - like a news item. Example: /like_news 12\n\
                /get_news <keywords> - search by comma-separated keywords. \
                Example: /get_news technology, ai\n\n\
                The daily digest of yesterday's items is sent automatically."
                .to_string(),
            Self::AwaitingBody => "📰 Please send the news text you want to add:".to_string(),
            Self::AwaitingTags => {
                "🏷️ Got it! Now send the tags for this item (comma-separated):".to_string()
            }
            Self::SubmissionExpired => {
                "⌛ Your submission session expired. Send /add_news to start again.".to_string()
            }
            Self::ItemAdded { item, tags } => format!(
                "✅ News added!\n📰 News ID: {item}\n🏷️ Tags: {}",
                tags.join(", ")
            ),
            Self::Approved { item, approvals } => {
                format!("👍 You liked news #{item}!\nTotal likes: {approvals}")
            }
            Self::AlreadyApproved { item } => {
                format!("ℹ️ You have already liked news #{item}.")
            }
            Self::SearchResults { keywords, hits } => render_search_results(keywords, hits),
            Self::NoMatches { keywords } => {
                format!("🔍 No news found matching: {}", keywords.join(", "))
            }
            Self::Unrecognized => {
                "🤖 I didn't understand that. Use /help to see available commands.".to_string()
            }
        }
    }
}

fn render_search_results(keywords: &[String], hits: &[SearchHit]) -> String {
    let mut out = format!(
        "📰 Found {} news item(s) matching: {}\n\n",
        hits.len(),
        keywords.join(", ")
    );

    for hit in hits.iter().take(SEARCH_DISPLAY_LIMIT) {
        out.push_str(&format!("📄 News #{}\n", hit.item.id));
        out.push_str(&format!("📅 {}\n", format_utc(hit.item.created_at)));
        out.push_str(&format!("👍 {} likes\n", hit.approvals));
        out.push_str(&format!("🏷️ Tags: {}\n", hit.item.tags.join(", ")));
        out.push_str(&format!(
            "📝 {}\n\n",
            excerpt(&hit.item.body, SEARCH_BODY_BUDGET)
        ));
    }

    if hits.len() > SEARCH_DISPLAY_LIMIT {
        out.push_str(&format!(
            "... and {} more item(s).",
            hits.len() - SEARCH_DISPLAY_LIMIT
        ));
    }
    out
}

fn format_utc(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
