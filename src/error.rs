//! Error types for feedstock-automerge
//!
//! Policy rejections are never errors: they travel as values in
//! [`GateOutcome`](crate::gate::GateOutcome). Everything in here aborts the run.

use thiserror::Error;

/// Errors that abort an automerge evaluation
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API returned something we could not use
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Transport failure on a raw HTTP request (includes non-2xx responses)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure reported by the octocrab client
    #[error("GitHub client error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Policy configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// No usable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Feedstock workspace files could not be read or parsed
    #[error("workspace error: {0}")]
    Workspace(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
