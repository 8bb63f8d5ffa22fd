//! SDK error types
//!
//! Every SDK call returns [`Result`]. Application layers (the provider and the
//! CLI) wrap these with `anyhow` context.

use thiserror::Error;

/// Result alias used throughout the SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the REST SDK
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (DNS, TLS, connection reset...)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status outside the call's allow-list
    #[error("{method} {url} returned {status}, expected one of {expected:?}")]
    UnexpectedStatus {
        method: String,
        url: String,
        status: u16,
        body: String,
        expected: Vec<u16>,
    },

    /// The body was not valid JSON or did not match the target shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response JSON did not carry the resource's envelope key
    #[error("response has no \"{key}\" field")]
    MissingEnvelopeKey { key: String },

    /// A request body could not be serialized
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// Options could not be turned into a query string
    #[error("invalid query options: {0}")]
    Query(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A polling budget ran out before the resource reached its target status
    #[error("timed out after {elapsed_secs}s waiting for status \"{target}\" (last seen: {last})")]
    Timeout {
        target: String,
        last: String,
        elapsed_secs: u64,
    },

    /// The resource entered a terminal failure status while being polled
    #[error("resource entered status \"{status}\" while waiting for \"{target}\"")]
    FailedStatus { status: String, target: String },

    #[error("authentication: {0}")]
    Auth(String),
}

impl Error {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            Error::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the server reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
