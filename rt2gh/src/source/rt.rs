//! Thin client for RT's REST 1.0 text interface.
//!
//! RT answers every request with an HTTP 200 and puts the real status on
//! the first body line (`RT/4.4.3 200 Ok`), so each call here checks that
//! line before parsing the rest. Credentials ride along as query
//! parameters on every request; there is no session state.

use super::{SourceError, SourceTracker, Ticket, Transaction};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Continuation lines of a long-format `Content:` field are aligned under
/// the field value, nine columns in.
const CONTENT_MARGIN: &str = "         ";

/// RT REST 1.0 client.
pub struct RtClient {
    http: reqwest::Client,
    base_url: Url,
    user: String,
    password: String,
}

impl RtClient {
    /// Creates a client for the RT instance at `base_url`.
    #[must_use]
    pub fn new(base_url: Url, user: String, password: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            user,
            password,
        }
    }

    fn rest_url(&self, path: &str) -> String {
        format!(
            "{}/REST/1.0/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String, SourceError> {
        let response = self
            .http
            .get(self.rest_url(path))
            .query(&[("user", self.user.as_str()), ("pass", self.password.as_str())])
            .query(params)
            .send()
            .await?;
        Ok(response.text().await?)
    }

    async fn post(&self, path: &str, content: String) -> Result<String, SourceError> {
        let response = self
            .http
            .post(self.rest_url(path))
            .query(&[("user", self.user.as_str()), ("pass", self.password.as_str())])
            .form(&[("content", content)])
            .send()
            .await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl SourceTracker for RtClient {
    async fn search(&self, queue: &str, statuses: &[&str]) -> Result<Vec<u64>, SourceError> {
        let query = search_query(queue, statuses);
        debug!(queue = %queue, query = %query, "Searching queue");

        let body = self
            .get(
                "search/ticket",
                &[("query", query.as_str()), ("format", "i"), ("orderby", "id")],
            )
            .await?;
        check_status(&body).map_err(|reason| SourceError::Search {
            queue: queue.to_string(),
            reason,
        })?;
        Ok(parse_search(&body))
    }

    async fn fetch(&self, ticket_id: u64) -> Result<Ticket, SourceError> {
        let show = self.get(&format!("ticket/{ticket_id}/show"), &[]).await?;
        check_status(&show).map_err(|reason| SourceError::TicketFetch {
            id: ticket_id,
            reason,
        })?;
        if let Some(note) = error_note(&show) {
            return Err(SourceError::TicketFetch {
                id: ticket_id,
                reason: note.to_string(),
            });
        }
        let (subject, custom_fields) =
            parse_show(&show).ok_or_else(|| SourceError::TicketFetch {
                id: ticket_id,
                reason: "response carried no Subject field".to_string(),
            })?;

        let history = self
            .get(&format!("ticket/{ticket_id}/history"), &[("format", "l")])
            .await?;
        check_status(&history).map_err(|reason| SourceError::TicketFetch {
            id: ticket_id,
            reason,
        })?;
        let transactions = parse_history(&history);
        debug!(ticket_id, count = transactions.len(), "Fetched ticket history");

        Ok(Ticket {
            id: ticket_id,
            subject,
            custom_fields,
            transactions,
        })
    }

    async fn append_correspondence(
        &self,
        ticket_id: u64,
        message: &str,
    ) -> Result<(), SourceError> {
        let content = correspond_content(ticket_id, message);
        let body = self
            .post(&format!("ticket/{ticket_id}/comment"), content)
            .await?;
        check_status(&body).map_err(|reason| SourceError::Correspondence {
            id: ticket_id,
            reason,
        })?;
        Ok(())
    }
}

/// Checks the RT status line at the top of a response body.
fn check_status(body: &str) -> Result<(), String> {
    let first_line = body.lines().next().unwrap_or_default();
    if first_line.contains(" 200 ") {
        Ok(())
    } else {
        Err(first_line.to_string())
    }
}

/// Pulls the `# ...` note RT puts in an otherwise-OK response when a
/// ticket is missing or access is denied.
fn error_note(body: &str) -> Option<&str> {
    body.lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# "))
}

fn search_query(queue: &str, statuses: &[&str]) -> String {
    let status_clause = statuses
        .iter()
        .map(|status| format!("Status = '{status}'"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("Queue = '{queue}' AND ( {status_clause} )")
}

/// Parses a `format=i` search response: one `ticket/<id>` line per hit.
fn parse_search(body: &str) -> Vec<u64> {
    body.lines()
        .filter_map(|line| line.strip_prefix("ticket/")?.trim().parse().ok())
        .collect()
}

/// Parses a `ticket/<id>/show` response into subject and custom fields.
///
/// Custom fields appear as `CF.{Name}: value` on modern RT and `CF-Name:
/// value` on older instances; both are accepted.
fn parse_show(body: &str) -> Option<(String, Vec<(String, String)>)> {
    let mut subject = None;
    let mut custom_fields = Vec::new();

    for line in body.lines() {
        if let Some(value) = line.strip_prefix("Subject:") {
            subject = Some(value.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("CF.{") {
            if let Some((name, value)) = rest.split_once("}:") {
                custom_fields.push((name.to_string(), value.trim().to_string()));
            }
        } else if let Some(rest) = line.strip_prefix("CF-") {
            if let Some((name, value)) = rest.split_once(':') {
                custom_fields.push((name.to_string(), value.trim().to_string()));
            }
        }
    }

    Some((subject?, custom_fields))
}

/// Parses a `format=l` history response into transactions, oldest first.
///
/// Records are separated by `--` lines. Only records carrying all of
/// `Creator`, `Created` and `Content` become transactions; anything else
/// (headers, truncated records) is dropped.
fn parse_history(body: &str) -> Vec<Transaction> {
    body.split("\n--\n").filter_map(parse_history_record).collect()
}

fn parse_history_record(record: &str) -> Option<Transaction> {
    let mut creator = None;
    let mut created = None;
    let mut content: Option<String> = None;
    let mut in_content = false;

    for line in record.lines() {
        if in_content {
            if line.is_empty() {
                if let Some(text) = content.as_mut() {
                    text.push('\n');
                }
                continue;
            }
            if let Some(continuation) = line.strip_prefix(CONTENT_MARGIN) {
                if let Some(text) = content.as_mut() {
                    text.push('\n');
                    text.push_str(continuation);
                }
                continue;
            }
            in_content = false;
        }

        if let Some(value) = line.strip_prefix("Creator:") {
            creator = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Created:") {
            created = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Content:") {
            content = Some(value.trim_start().to_string());
            in_content = true;
        }
    }

    Some(Transaction {
        creator: creator?,
        created: created?,
        content: content?.trim_end().to_string(),
    })
}

/// Builds the REST 1.0 form content for a correspondence post. Multiline
/// text values need their continuation lines indented under the field.
fn correspond_content(ticket_id: u64, message: &str) -> String {
    let mut content = format!("id: {ticket_id}\nAction: correspond\nText:");
    let mut lines = message.lines();
    if let Some(first) = lines.next() {
        content.push(' ');
        content.push_str(first);
    }
    for line in lines {
        content.push_str("\n      ");
        content.push_str(line);
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NO_CONTENT_SENTINEL;

    #[test]
    fn status_line_detected() {
        assert!(check_status("RT/4.4.3 200 Ok\n\nticket/1\n").is_ok());
        assert_eq!(
            check_status("RT/4.4.3 401 Credentials required\n"),
            Err("RT/4.4.3 401 Credentials required".to_string())
        );
    }

    #[test]
    fn search_query_covers_all_statuses() {
        let query = search_query("cpan-Foo-Bar", &["new", "open", "stalled"]);
        assert_eq!(
            query,
            "Queue = 'cpan-Foo-Bar' AND ( Status = 'new' OR Status = 'open' OR Status = 'stalled' )"
        );
    }

    #[test]
    fn search_response_yields_ids() {
        let body = "RT/4.4.3 200 Ok\n\nticket/12\nticket/34\nticket/56\n";
        assert_eq!(parse_search(body), vec![12, 34, 56]);
    }

    #[test]
    fn empty_search_response_yields_nothing() {
        let body = "RT/4.4.3 200 Ok\n\nNo matching results.\n";
        assert!(parse_search(body).is_empty());
    }

    #[test]
    fn show_response_yields_subject_and_custom_fields() {
        let body = "RT/4.4.3 200 Ok\n\n\
                    id: ticket/42\n\
                    Queue: cpan-Foo-Bar\n\
                    Subject: Crash on save\n\
                    Status: open\n\
                    CF.{Severity}: critical\n\
                    CF.{Perl Version}: 5.32\n";
        let (subject, custom_fields) = parse_show(body).unwrap();
        assert_eq!(subject, "Crash on save");
        assert_eq!(
            custom_fields,
            vec![
                ("Severity".to_string(), "critical".to_string()),
                ("Perl Version".to_string(), "5.32".to_string()),
            ]
        );
    }

    #[test]
    fn show_response_accepts_old_style_custom_fields() {
        let body = "RT/3.8.1 200 Ok\n\nSubject: Old tracker\nCF-Severity: minor\n";
        let (_, custom_fields) = parse_show(body).unwrap();
        assert_eq!(
            custom_fields,
            vec![("Severity".to_string(), "minor".to_string())]
        );
    }

    #[test]
    fn show_without_subject_is_rejected() {
        assert!(parse_show("RT/4.4.3 200 Ok\n\n# Ticket 99 does not exist.\n").is_none());
    }

    #[test]
    fn missing_ticket_note_is_surfaced() {
        let body = "RT/4.4.3 200 Ok\n\n# Ticket 99 does not exist.\n";
        assert_eq!(error_note(body), Some("Ticket 99 does not exist."));
    }

    #[test]
    fn history_records_become_transactions() {
        let body = "RT/4.4.3 200 Ok\n\n\
                    # 3/3 (id/28/total)\n\n\
                    id: 28\n\
                    Ticket: 42\n\
                    Type: Create\n\
                    Content: Saving a file crashes the editor.\n\
                    \n\
                    Creator: alice@example.com\n\
                    Created: 2019-03-01 10:00:00\n\
                    \n--\n\
                    id: 29\n\
                    Ticket: 42\n\
                    Type: Status\n\
                    Content: This transaction appears to have no content\n\
                    \n\
                    Creator: bob@example.com\n\
                    Created: 2019-03-02 11:00:00\n\
                    \n--\n\
                    id: 30\n\
                    Ticket: 42\n\
                    Type: Correspond\n\
                    Content: Reproduced on 5.30.\n\
                    \n\
                    Creator: carol@example.com\n\
                    Created: 2019-03-03 12:00:00\n";

        let transactions = parse_history(body);
        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].creator, "alice@example.com");
        assert_eq!(transactions[0].content, "Saving a file crashes the editor.");
        assert_eq!(transactions[1].content, NO_CONTENT_SENTINEL);
        assert!(!transactions[1].has_content());
        assert_eq!(transactions[2].created, "2019-03-03 12:00:00");
    }

    #[test]
    fn multiline_content_is_reassembled() {
        let record = "id: 31\n\
                      Content: first line\n\
                      \x20\x20\x20\x20\x20\x20\x20\x20\x20second line\n\
                      \n\
                      \x20\x20\x20\x20\x20\x20\x20\x20\x20after a blank\n\
                      \n\
                      Creator: dave@example.com\n\
                      Created: 2019-03-04 13:00:00\n";
        let transaction = parse_history_record(record).unwrap();
        assert_eq!(
            transaction.content,
            "first line\nsecond line\n\nafter a blank"
        );
    }

    #[test]
    fn records_without_content_are_dropped() {
        let body = "RT/4.4.3 200 Ok\n\n# 1/1\n\nid: 1\nType: AddWatcher\n";
        assert!(parse_history(body).is_empty());
    }

    #[test]
    fn correspond_content_indents_continuations() {
        let content = correspond_content(7, "line one\nline two");
        assert_eq!(
            content,
            "id: 7\nAction: correspond\nText: line one\n      line two"
        );
    }
}
