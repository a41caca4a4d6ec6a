//! Line parsing for the console transport stand-in.
//!
//! Maps the slash-command vocabulary onto [`Command`] values. Parsing
//! lives here, not in `newsdesk-server` — the core
//! contract is that commands arrive already parsed, so each transport
//! owns its own syntax.

use newsdesk_core::ids::ItemId;
use newsdesk_server::{Command, parse_tags};

/// Parse one input line into a command, or a user-facing rejection.
pub fn parse_line(line: &str) -> Result<Command, String> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix('/') {
        let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let args = args.trim();
        return match name {
            "start" => Ok(Command::Register),
            "help" => Ok(Command::Help),
            "add_news" => Ok(Command::BeginSubmission),
            "like_news" => args
                .parse::<u64>()
                .map(|id| Command::Approve { item: ItemId(id) })
                .map_err(|_| "❌ Please provide a valid news ID (number).".to_string()),
            "get_news" => Ok(Command::Search {
                keywords: parse_tags(args),
            }),
            _ => Err(format!("❌ Unknown command /{name}. Use /help.")),
        };
    }

    Ok(Command::Text(line.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_simple_commands() {
        assert_matches!(parse_line("/start"), Ok(Command::Register));
        assert_matches!(parse_line("/help"), Ok(Command::Help));
        assert_matches!(parse_line("/add_news"), Ok(Command::BeginSubmission));
    }

    #[test]
    fn parses_like_with_id() {
        assert_matches!(
            parse_line("/like_news 12"),
            Ok(Command::Approve { item: ItemId(12) })
        );
    }

    #[test]
    fn rejects_non_numeric_like_id() {
        assert!(parse_line("/like_news twelve").is_err());
        assert!(parse_line("/like_news").is_err());
    }

    #[test]
    fn parses_search_keywords() {
        assert_matches!(
            parse_line("/get_news technology, AI"),
            Ok(Command::Search { keywords }) if keywords == vec!["technology", "AI"]
        );
    }

    #[test]
    fn search_with_no_keywords_still_parses() {
        // Validation (missing keywords) is the router's job.
        assert_matches!(
            parse_line("/get_news"),
            Ok(Command::Search { keywords }) if keywords.is_empty()
        );
    }

    #[test]
    fn unknown_slash_command_is_rejected() {
        assert!(parse_line("/frobnicate").is_err());
    }

    #[test]
    fn plain_text_feeds_the_dialog() {
        assert_matches!(
            parse_line("  some news text "),
            Ok(Command::Text(t)) if t == "some news text"
        );
    }
}
