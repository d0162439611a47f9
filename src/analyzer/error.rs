// src/analyzer/error.rs
// =============================================================================
// Errors that abort a page analysis.
//
// Only the page fetch can fail an analysis. Problems while probing individual
// links never show up here: they are folded into the inaccessible counts.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The URL could not be turned into a request (bad syntax, no host,
    /// or a scheme other than http/https)
    #[error("failed to create request for '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network, DNS, TLS or timeout failure while fetching the page
    #[error("failed to execute request: {0}")]
    Transport(#[from] reqwest::Error),

    /// The caller cancelled the analysis while the page was being fetched
    #[error("request cancelled")]
    Cancelled,

    /// The page answered, but not with a 2xx status
    #[error("request failed with status code: {0}")]
    Status(u16),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
