//! Configuration error types.

use thiserror::Error;

/// Errors that make a run impossible before either tracker is contacted.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential was not supplied.
    #[error("missing required credential: --{name}")]
    MissingCredential { name: &'static str },

    /// The target repository argument is not `owner/name`.
    #[error("target repository must be given as 'owner/name', got '{value}'")]
    InvalidRepo { value: String },

    /// Neither explicit ticket ids nor queues were given.
    #[error("nothing to migrate; pass --ticket or --queue at least once")]
    NothingToMigrate,
}
