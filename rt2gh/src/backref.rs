//! Back-reference tag formatting and parsing.
//!
//! The tag embedded in an issue title (`[rt.cpan.org #1234]`) is the sole
//! key used to recognize already-migrated tickets on later runs, so the
//! formatting and parsing sides must agree exactly.

use url::Url;

/// Host name embedded in the back-reference tag.
pub const SOURCE_HOST: &str = "rt.cpan.org";

/// Builds the title for a migrated issue.
///
/// Format: `<subject> [rt.cpan.org #<ticket-id>]`
#[must_use]
pub fn issue_title(subject: &str, ticket_id: u64) -> String {
    format!("{subject} [{SOURCE_HOST} #{ticket_id}]")
}

/// Extracts the source ticket id from an issue title, if the title carries
/// a back-reference tag.
///
/// Only titles ending in the exact tag format produced by [`issue_title`]
/// match; anything else returns `None`.
#[must_use]
pub fn parse_source_id(title: &str) -> Option<u64> {
    let open = format!("[{SOURCE_HOST} #");
    let rest = title.strip_suffix(']')?;
    let start = rest.rfind(&open)?;
    rest[start + open.len()..].parse().ok()
}

/// Deep link to a ticket on the source tracker.
#[must_use]
pub fn ticket_url(base_url: &Url, ticket_id: u64) -> String {
    format!(
        "{}/Ticket/Display.html?id={}",
        base_url.as_str().trim_end_matches('/'),
        ticket_id
    )
}

/// The correspondence note left on a migrated ticket when back-referencing
/// is enabled.
#[must_use]
pub fn correspondence_message(issue_url: &str) -> String {
    format!(
        "This ticket has been migrated to GitHub and is now tracked at:\n\
         \n\
         {issue_url}\n\
         \n\
         Please direct any future correspondence to the GitHub issue. This\n\
         ticket will remain open, and will be closed once the GitHub issue\n\
         is resolved."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_embeds_tag() {
        assert_eq!(
            issue_title("Crash on save", 42),
            "Crash on save [rt.cpan.org #42]"
        );
    }

    #[test]
    fn parse_recovers_formatted_id() {
        for id in [0, 1, 42, 99_999, u64::MAX] {
            let title = issue_title("Some subject", id);
            assert_eq!(parse_source_id(&title), Some(id));
        }
    }

    #[test]
    fn parse_rejects_untagged_titles() {
        assert_eq!(parse_source_id("Plain title"), None);
        assert_eq!(parse_source_id("Trailing text [rt.cpan.org #12] more"), None);
        assert_eq!(parse_source_id("[rt.cpan.org #notanumber]"), None);
        assert_eq!(parse_source_id("[rt.cpan.org #]"), None);
    }

    #[test]
    fn parse_handles_brackets_in_subject() {
        let title = issue_title("weird [subject] here", 7);
        assert_eq!(parse_source_id(&title), Some(7));
    }

    #[test]
    fn ticket_url_points_at_display_page() {
        let base = Url::parse("https://rt.cpan.org").unwrap();
        assert_eq!(
            ticket_url(&base, 42),
            "https://rt.cpan.org/Ticket/Display.html?id=42"
        );
    }

    #[test]
    fn correspondence_mentions_url_and_lifecycle() {
        let message = correspondence_message("https://github.com/o/r/issues/1");
        assert!(message.contains("https://github.com/o/r/issues/1"));
        assert!(message.contains("future correspondence"));
        assert!(message.contains("remain open"));
        assert!(message.contains("closed once"));
    }
}
