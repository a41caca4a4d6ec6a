//! Display-budget text helpers.
//!
//! User-facing rendering truncates item bodies to a fixed number of
//! characters. Budgets are counted in `char`s, not bytes — `&str[..n]`
//! panics inside a multi-byte character, and tag/body text is frequently
//! non-ASCII.

/// Display budget for item bodies in search results.
pub const SEARCH_BODY_BUDGET: usize = 200;

/// Display budget for item bodies in the daily digest.
pub const DIGEST_BODY_BUDGET: usize = 150;

/// Marker appended to a truncated body.
pub const ELLIPSIS: &str = "...";

/// Truncate `s` to at most `max_chars` characters.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// First `max_chars` characters of `s`, with [`ELLIPSIS`] appended when
/// the original is longer. Strings within budget come back unchanged.
#[must_use]
pub fn excerpt(s: &str, max_chars: usize) -> String {
    let cut = truncate_chars(s, max_chars);
    if cut.len() == s.len() {
        s.to_owned()
    } else {
        format!("{cut}{ELLIPSIS}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
