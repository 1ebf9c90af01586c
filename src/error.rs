//! Error taxonomy for the import pipeline
//!
//! Submission-path errors are surfaced synchronously to the caller. Errors
//! inside the polling loop are either absorbed (transient) or converted into
//! a terminal tracker state (stale), never raised out of the loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Required target fields left unmapped; detected before any network call
    #[error("required fields not mapped: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// The create-job call was rejected by the server
    #[error("import submission failed: {message}")]
    Submission { message: String },

    /// The create-job call never reached the server
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a payload we could not decode
    #[error("invalid response payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Local file could not be read before submission
    #[error("could not read import file: {0}")]
    File(#[from] std::io::Error),
}
