//! Fatal error conditions that callers need to tell apart.
//!
//! Everything is still propagated as `anyhow::Error`; these variants exist so
//! the command layer and the tests can downcast and match on them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TresError {
    /// A required environment variable is not set
    #[error("{0} environment variable not set")]
    MissingCredential(&'static str),

    /// Output format name did not match any renderer
    #[error("invalid output format: {0}")]
    InvalidFormat(String),

    /// Format exists but the command cannot produce it
    #[error("format {format} not supported for the {command} command")]
    UnsupportedFormat {
        format: String,
        command: &'static str,
    },

    /// `@limit` directive value is not an integer
    #[error("invalid @limit value '{0}'")]
    InvalidLimit(String),

    /// Remote service answered with a non-2xx status
    #[error("HTTP Status {status}")]
    Http { status: String },

    #[error("board '{0}' not found")]
    UnknownBoard(String),
}
