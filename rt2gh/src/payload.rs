//! Issue and comment payload construction.
//!
//! Everything textual that lands on the target tracker is produced here,
//! so issue bodies and comment bodies share one encoding and one set of
//! formatting rules.

use crate::backref;
use crate::source::{Ticket, Transaction};
use crate::target::NewIssue;
use url::Url;

/// Label applied to every migrated issue.
pub const MIGRATED_LABEL: &str = "migrated";

/// Margin prepended to every line of the migrated description.
const DESCRIPTION_MARGIN: &str = "    ";

/// Builds the full issue payload for a ticket.
///
/// The description transaction supplies the body; it is not replayed as a
/// comment.
#[must_use]
pub fn build_issue(ticket: &Ticket, description: &Transaction, rt_base_url: &Url) -> NewIssue {
    NewIssue {
        title: backref::issue_title(&ticket.subject, ticket.id),
        body: issue_body(ticket.id, &description.content, rt_base_url),
        labels: labels_for(ticket),
    }
}

/// Builds the issue body: a deep link back to the ticket, then the
/// description indented by a fixed margin.
fn issue_body(ticket_id: u64, description: &str, rt_base_url: &Url) -> String {
    let link = backref::ticket_url(rt_base_url, ticket_id);
    format!("Migrated from {link}:\n\n{}", indent(description))
}

/// Computes the label set for a ticket: the fixed migrated label, plus the
/// value of every `severity` custom field (name matched case-insensitively)
/// that has a non-empty value.
#[must_use]
pub fn labels_for(ticket: &Ticket) -> Vec<String> {
    let mut labels = vec![MIGRATED_LABEL.to_string()];
    for (name, value) in &ticket.custom_fields {
        if name.eq_ignore_ascii_case("severity") && !value.is_empty() {
            labels.push(value.clone());
        }
    }
    labels
}

/// Builds a comment body for a replayed transaction.
///
/// Format: `<creator> - <timestamp>`, a blank line, then the content.
#[must_use]
pub fn comment_body(transaction: &Transaction) -> String {
    format!(
        "{} - {}\n\n{}",
        transaction.creator, transaction.created, transaction.content
    )
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("{DESCRIPTION_MARGIN}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(custom_fields: Vec<(String, String)>) -> Ticket {
        Ticket {
            id: 42,
            subject: "Crash on save".to_string(),
            custom_fields,
            transactions: Vec::new(),
        }
    }

    fn transaction(content: &str) -> Transaction {
        Transaction {
            creator: "alice@example.com".to_string(),
            created: "2019-03-01 10:00:00".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn issue_carries_title_link_and_indented_body() {
        let base = Url::parse("https://rt.cpan.org").unwrap();
        let description = transaction("line one\nline two");
        let issue = build_issue(&ticket(Vec::new()), &description, &base);

        assert_eq!(issue.title, "Crash on save [rt.cpan.org #42]");
        assert_eq!(
            issue.body,
            "Migrated from https://rt.cpan.org/Ticket/Display.html?id=42:\n\n    line one\n    line two"
        );
    }

    #[test]
    fn severity_field_becomes_a_label_regardless_of_case() {
        let labels = labels_for(&ticket(vec![(
            "Severity".to_string(),
            "critical".to_string(),
        )]));
        assert_eq!(labels, vec!["migrated", "critical"]);

        let labels = labels_for(&ticket(vec![(
            "SEVERITY".to_string(),
            "minor".to_string(),
        )]));
        assert_eq!(labels, vec!["migrated", "minor"]);
    }

    #[test]
    fn empty_or_unrelated_fields_yield_only_the_migrated_label() {
        let labels = labels_for(&ticket(vec![
            ("Severity".to_string(), String::new()),
            ("Priority".to_string(), "high".to_string()),
        ]));
        assert_eq!(labels, vec!["migrated"]);

        assert_eq!(labels_for(&ticket(Vec::new())), vec!["migrated"]);
    }

    #[test]
    fn comment_body_leads_with_creator_and_timestamp() {
        let body = comment_body(&transaction("Reproduced on 5.30."));
        assert_eq!(
            body,
            "alice@example.com - 2019-03-01 10:00:00\n\nReproduced on 5.30."
        );
    }
}
