#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod backref;
pub mod config;
pub mod payload;
pub mod planner;
pub mod runner;
pub mod source;
pub mod summary;
pub mod target;

pub use backref::{correspondence_message, issue_title, parse_source_id, ticket_url};
pub use config::{ConfigError, MigratorConfig};
pub use payload::{build_issue, comment_body, labels_for, MIGRATED_LABEL};
pub use planner::plan;
pub use runner::{Runner, RunnerError};
pub use source::{
    list_candidate_ids, RtClient, SourceError, SourceTracker, Ticket, Transaction,
    NO_CONTENT_SENTINEL, OPEN_STATUSES,
};
pub use summary::{RunSummary, TicketOutcome};
pub use target::{
    list_migrated_ids, CreatedIssue, GithubTracker, IssuePage, NewIssue, TargetError,
    TargetTracker, PAGE_SIZE,
};
