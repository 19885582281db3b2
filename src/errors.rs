//! Typed error hierarchy for the board engine and its REST collaborator.
//!
//! Two top-level enums cover the two failure domains:
//! - `ApiError` — transport, envelope, and decode failures from a backend
//! - `BoardError` — board-level failures wrapping the API layer

use thiserror::Error;

/// Errors from a backend call. Transport failures and application-level
/// `success: false` envelopes are distinct variants so callers can surface
/// the backend's own message verbatim when there is one.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to backend failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Backend reported failure: {message}")]
    Backend { message: String },

    #[error("Backend reported success but returned no data")]
    MissingData,

    #[error("Failed to decode backend response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from the board engine itself.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Unknown lane '{lane}'")]
    UnknownLane { lane: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}
