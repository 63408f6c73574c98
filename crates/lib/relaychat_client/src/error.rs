//! Client error types.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid relay URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with a non-success status.
    #[error("Relay returned {status}: {message}")]
    Relay { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The spawned call panicked or was cancelled before producing a reply.
    #[error("Relay call aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}
