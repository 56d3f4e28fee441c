//! GitHub implementation of the target tracker.

use super::rate_limit::ensure_core_rate_limit;
use super::{CreatedIssue, IssuePage, NewIssue, TargetError, TargetTracker, PAGE_SIZE};
use async_trait::async_trait;
use octocrab::{params, Octocrab};
use tracing::debug;

/// Target tracker backed by a GitHub repository.
pub struct GithubTracker {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GithubTracker {
    /// Builds a tracker for `owner/repo` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`octocrab::Error`] if the client cannot be constructed.
    pub fn new(token: String, owner: String, repo: String) -> Result<Self, octocrab::Error> {
        let octocrab = Octocrab::builder().personal_token(token).build()?;
        Ok(Self {
            octocrab,
            owner,
            repo,
        })
    }
}

#[async_trait]
impl TargetTracker for GithubTracker {
    async fn list_open_issues(&self, page: u32) -> Result<IssuePage, TargetError> {
        debug!(page, "Listing open issues");
        let listing = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .list()
            .state(params::State::Open)
            .per_page(PAGE_SIZE)
            .page(page)
            .send()
            .await?;

        Ok(IssuePage {
            has_next: listing.next.is_some(),
            titles: listing.items.into_iter().map(|issue| issue.title).collect(),
        })
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TargetError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let created = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .create(&issue.title)
            .body(&issue.body)
            .labels(issue.labels.clone())
            .send()
            .await?;

        Ok(CreatedIssue {
            number: created.number,
            url: created.html_url.to_string(),
        })
    }

    async fn create_comment(&self, issue_number: u64, body: &str) -> Result<(), TargetError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(&self.owner, &self.repo)
            .create_comment(issue_number, body)
            .await?;
        Ok(())
    }
}
