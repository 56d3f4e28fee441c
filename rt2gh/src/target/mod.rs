//! Target tracker (GitHub) capability boundary.
//!
//! Mirrors the source side: the core consumes the [`TargetTracker`] trait,
//! [`GithubTracker`] implements it over octocrab, and tests use fakes.

mod error;
mod github;
mod rate_limit;

pub use error::TargetError;
pub use github::GithubTracker;
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};

use crate::backref::parse_source_id;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Page size the target tracker serves issue listings at.
pub const PAGE_SIZE: u8 = 30;

/// Payload for a new issue.
#[derive(Debug, Clone)]
pub struct NewIssue {
    /// Issue title, carrying the back-reference tag.
    pub title: String,

    /// Issue body.
    pub body: String,

    /// Labels to apply at creation time.
    pub labels: Vec<String>,
}

/// A successfully created issue.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedIssue {
    /// Issue number, used for attaching comments.
    pub number: u64,

    /// Issue URL.
    pub url: String,
}

/// One page of an open-issue listing.
#[derive(Debug, Clone)]
pub struct IssuePage {
    /// Titles of the issues on this page.
    pub titles: Vec<String>,

    /// Whether another page follows.
    pub has_next: bool,
}

/// Capability the migration core needs from the target tracker.
#[async_trait]
pub trait TargetTracker: Send + Sync {
    /// Lists one page of open issues. Pages start at 1.
    async fn list_open_issues(&self, page: u32) -> Result<IssuePage, TargetError>;

    /// Creates an issue and returns its number and URL.
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TargetError>;

    /// Attaches a comment to an issue.
    async fn create_comment(&self, issue_number: u64, body: &str) -> Result<(), TargetError>;
}

/// Collects the ids of all already-migrated tickets from the target's open
/// issues.
///
/// Walks every page of the listing before returning; the target paginates
/// at [`PAGE_SIZE`] entries, and ids beyond the first page would otherwise
/// be re-migrated.
///
/// # Errors
///
/// Returns [`TargetError`] if any page fails to list.
pub async fn list_migrated_ids<T>(target: &T) -> Result<HashSet<u64>, TargetError>
where
    T: TargetTracker + ?Sized,
{
    let mut ids = HashSet::new();
    let mut page = 1u32;

    loop {
        let listing = target.list_open_issues(page).await?;
        for title in &listing.titles {
            if let Some(id) = parse_source_id(title) {
                ids.insert(id);
            }
        }
        if !listing.has_next {
            break;
        }
        page += 1;
    }

    debug!(count = ids.len(), pages = page, "Collected migrated ticket ids");
    Ok(ids)
}
