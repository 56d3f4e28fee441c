//! Run configuration.
//!
//! All credentials and knobs are resolved once at startup (by the CLI or a
//! library caller) and passed in explicitly; nothing is read from config
//! files or hidden globals. Validation failures are the only fatal errors
//! in the system and happen before either tracker is contacted.

mod error;

pub use error::ConfigError;

use std::time::Duration;
use url::Url;

/// Default base delay before retrying the first comment on a fresh issue.
pub const DEFAULT_FIRST_COMMENT_DELAY: Duration = Duration::from_secs(5);

/// Default number of retries for the first comment on a fresh issue.
pub const DEFAULT_FIRST_COMMENT_RETRIES: u32 = 3;

/// Configuration for a migration run.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    /// Base URL of the RT instance.
    rt_base_url: Url,
    /// RT username.
    rt_user: String,
    /// RT password.
    rt_password: String,
    /// Owner of the target GitHub repository.
    github_owner: String,
    /// Name of the target GitHub repository.
    github_repo: String,
    /// GitHub token used for API calls.
    github_token: String,
    /// Explicit ticket ids to migrate. Takes precedence over queues.
    ticket_ids: Vec<u64>,
    /// RT queues to pull open tickets from.
    queues: Vec<String>,
    /// Whether to preview changes without creating issues/comments.
    dry_run: bool,
    /// Whether to leave a correspondence note on each migrated ticket.
    comment_back: bool,
    /// Base delay for the first-comment retry backoff.
    first_comment_delay: Duration,
    /// Retry count for the first-comment backoff.
    first_comment_retries: u32,
}

impl MigratorConfig {
    /// Creates a configuration with the required credentials and target.
    pub fn new(
        rt_base_url: Url,
        rt_user: String,
        rt_password: String,
        github_owner: String,
        github_repo: String,
        github_token: String,
    ) -> Self {
        Self {
            rt_base_url,
            rt_user,
            rt_password,
            github_owner,
            github_repo,
            github_token,
            ticket_ids: Vec::new(),
            queues: Vec::new(),
            dry_run: false,
            comment_back: false,
            first_comment_delay: DEFAULT_FIRST_COMMENT_DELAY,
            first_comment_retries: DEFAULT_FIRST_COMMENT_RETRIES,
        }
    }

    /// Sets explicit ticket ids to migrate.
    pub fn with_ticket_ids(mut self, ticket_ids: Vec<u64>) -> Self {
        self.ticket_ids = ticket_ids;
        self
    }

    /// Sets the queues to pull open tickets from.
    pub fn with_queues(mut self, queues: Vec<String>) -> Self {
        self.queues = queues;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enables or disables the back-reference note on migrated tickets.
    pub fn with_comment_back(mut self, comment_back: bool) -> Self {
        self.comment_back = comment_back;
        self
    }

    /// Sets the base delay for the first-comment retry backoff.
    pub fn with_first_comment_delay(mut self, delay: Duration) -> Self {
        self.first_comment_delay = delay;
        self
    }

    /// Sets the retry count for the first-comment backoff.
    pub fn with_first_comment_retries(mut self, retries: u32) -> Self {
        self.first_comment_retries = retries;
        self
    }

    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a credential is missing or when neither
    /// ticket ids nor queues were given.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rt_user.is_empty() {
            return Err(ConfigError::MissingCredential { name: "rt-user" });
        }
        if self.rt_password.is_empty() {
            return Err(ConfigError::MissingCredential { name: "rt-password" });
        }
        if self.github_token.is_empty() {
            return Err(ConfigError::MissingCredential { name: "token" });
        }
        if self.github_owner.is_empty() || self.github_repo.is_empty() {
            return Err(ConfigError::InvalidRepo {
                value: format!("{}/{}", self.github_owner, self.github_repo),
            });
        }
        if self.ticket_ids.is_empty() && self.queues.is_empty() {
            return Err(ConfigError::NothingToMigrate);
        }
        Ok(())
    }

    /// Returns the RT base URL.
    pub fn rt_base_url(&self) -> &Url {
        &self.rt_base_url
    }

    /// Returns the RT username.
    pub fn rt_user(&self) -> &str {
        &self.rt_user
    }

    /// Returns the RT password.
    pub fn rt_password(&self) -> &str {
        &self.rt_password
    }

    /// Returns the target repository owner.
    pub fn github_owner(&self) -> &str {
        &self.github_owner
    }

    /// Returns the target repository name.
    pub fn github_repo(&self) -> &str {
        &self.github_repo
    }

    /// Returns the GitHub token.
    pub fn github_token(&self) -> &str {
        &self.github_token
    }

    /// Returns the explicit ticket ids.
    pub fn ticket_ids(&self) -> &[u64] {
        &self.ticket_ids
    }

    /// Returns the configured queues.
    pub fn queues(&self) -> &[String] {
        &self.queues
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns whether back-referencing is enabled.
    pub fn comment_back(&self) -> bool {
        self.comment_back
    }

    /// Returns the base delay for the first-comment backoff.
    pub fn first_comment_delay(&self) -> Duration {
        self.first_comment_delay
    }

    /// Returns the retry count for the first-comment backoff.
    pub fn first_comment_retries(&self) -> u32 {
        self.first_comment_retries
    }
}

/// Splits an `owner/name` repository argument into its parts.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidRepo`] when the value is not exactly
/// `owner/name` with both parts non-empty.
pub fn parse_repo(value: &str) -> Result<(String, String), ConfigError> {
    match value.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(ConfigError::InvalidRepo {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> MigratorConfig {
        MigratorConfig::new(
            Url::parse("https://rt.cpan.org").unwrap(),
            "user".to_string(),
            "secret".to_string(),
            "owner".to_string(),
            "repo".to_string(),
            "token".to_string(),
        )
    }

    #[test]
    fn valid_with_explicit_tickets() {
        let config = base_config().with_ticket_ids(vec![1, 2]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn valid_with_queues() {
        let config = base_config().with_queues(vec!["cpan-Foo-Bar".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_work_list() {
        let config = base_config();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NothingToMigrate)
        ));
    }

    #[test]
    fn rejects_missing_credentials() {
        let mut config = base_config().with_ticket_ids(vec![1]);
        config.rt_password = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential {
                name: "rt-password"
            })
        ));
    }

    #[test]
    fn parse_repo_splits_owner_and_name() {
        assert_eq!(
            parse_repo("octocat/hello").unwrap(),
            ("octocat".to_string(), "hello".to_string())
        );
    }

    #[test]
    fn parse_repo_rejects_malformed_values() {
        for value in ["", "noslash", "/repo", "owner/", "a/b/c"] {
            assert!(matches!(
                parse_repo(value),
                Err(ConfigError::InvalidRepo { .. })
            ));
        }
    }
}
