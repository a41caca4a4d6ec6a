//! Keyword matching over the item collection.
//!
//! An item matches when **any** keyword, case-insensitively, equals one of
//! the item's tags or appears as a substring of its body. OR across
//! keywords, OR across the two match modes. Results come back in storage
//! (insertion) order — oldest first, no relevance ranking — and each item
//! appears at most once even when several keywords hit it.
//!
//! Callers are expected to reject empty keyword lists before reaching this
//! module; an empty list simply matches nothing.

use newsdesk_core::model::NewsItem;

/// Case-insensitive normal form used for both keywords and tags.
fn normalize(s: &str) -> String {
    s.to_lowercase()
}

/// Does `item` match any of the (already normalized) keywords?
fn matches_any(item: &NewsItem, keywords: &[String]) -> bool {
    let body = normalize(&item.body);
    let tags: Vec<String> = item.tags.iter().map(|t| normalize(t)).collect();

    keywords
        .iter()
        .any(|kw| tags.iter().any(|tag| tag == kw) || body.contains(kw.as_str()))
}

/// Filter `items` down to those matching any keyword, preserving order.
///
/// The single forward pass with a per-item match test makes deduplication
/// structural: an item hit by three keywords is still emitted once.
pub fn search_items(items: &[NewsItem], keywords: &[String]) -> Vec<NewsItem> {
    let normalized: Vec<String> = keywords.iter().map(|k| normalize(k)).collect();
    items
        .iter()
        .filter(|item| matches_any(item, &normalized))
        .cloned()
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use newsdesk_core::ids::{ItemId, ParticipantId};

    fn item(id: u64, body: &str, tags: &[&str]) -> NewsItem {
        NewsItem {
            id: ItemId(id),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            body: body.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            author: ParticipantId(1),
        }
    }

    #[test]
    fn tag_match_is_case_insensitive_and_exact() {
        let items = vec![item(1, "irrelevant body", &["AI", "tech"])];
        let hits = search_items(&items, &["ai".to_string()]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ItemId(1));
    }

    #[test]
    fn tag_match_does_not_do_substrings() {
        // "ai" must not match the tag "brainstorm" — tag mode is exact.
        let items = vec![item(1, "nothing here", &["brainstorm"])];
        assert!(search_items(&items, &["ai".to_string()]).is_empty());
    }

    #[test]
    fn body_match_is_substring() {
        let items = vec![item(1, "this body contains ai inside", &["other"])];
        let hits = search_items(&items, &["AI".to_string()]);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn item_matching_both_modes_appears_once() {
        let items = vec![item(1, "all about ai today", &["ai"])];
        let hits = search_items(&items, &["ai".to_string(), "today".to_string()]);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn or_across_keywords() {
        let items = vec![
            item(1, "rust release notes", &["rust"]),
            item(2, "python news", &["python"]),
            item(3, "gardening", &["plants"]),
        ];
        let hits = search_items(&items, &["rust".to_string(), "python".to_string()]);
        assert_eq!(hits.iter().map(|i| i.id.value()).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn results_preserve_insertion_order() {
        let items = vec![
            item(3, "zzz common", &[]),
            item(1, "aaa common", &[]),
            item(2, "mmm common", &[]),
        ];
        let hits = search_items(&items, &["common".to_string()]);
        assert_eq!(hits.iter().map(|i| i.id.value()).collect::<Vec<_>>(), vec![3, 1, 2]);
    }

    #[test]
    fn empty_keyword_list_matches_nothing() {
        let items = vec![item(1, "anything", &["tag"])];
        assert!(search_items(&items, &[]).is_empty());
    }

    #[test]
    fn non_ascii_keywords_lowercase_correctly() {
        let items = vec![item(1, "Новости недели", &["НОВОСТИ"])];
        let hits = search_items(&items, &["новости".to_string()]);
        assert_eq!(hits.len(), 1);
    }
}
