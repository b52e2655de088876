//! Core types for feedstock-automerge

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A repository on the forge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoConfig {
    /// Create a repository reference
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl std::fmt::Display for RepoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(owner, repo))
            }
            _ => Err(Error::Config(format!(
                "expected repository as 'owner/name', got '{s}'"
            ))),
        }
    }
}

/// A legacy commit status posted by an external CI system
///
/// The same context may be posted many times for one commit; only the most
/// recently updated record is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    /// Free-text name of the posting system (e.g. `continuous-integration/travis-ci/pr`)
    pub context: String,
    /// Raw state (`pending`, `success`, `failure`, `error`)
    pub state: String,
    /// When this record was last updated
    pub updated_at: DateTime<Utc>,
}

/// A check run from the Checks API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check name
    pub name: String,
    /// Raw status (`queued`, `in_progress`, `completed`, ...)
    pub status: String,
    /// Raw conclusion, only meaningful once `status` is `completed`
    pub conclusion: Option<String>,
}

impl CheckRun {
    /// Whether the run has finished
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Pull request snapshot the policy is evaluated against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Login of the PR author
    pub author: String,
    /// PR title
    pub title: String,
    /// Label names
    pub labels: Vec<String>,
    /// SHA of the head commit
    pub head_sha: String,
    /// Whether PR can be merged
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = has conflicts
    /// - `None` = unknown (GitHub still computing)
    pub mergeable: Option<bool>,
    /// GitHub's mergeable state (`clean`, `unstable`, `dirty`, ...), lowercase
    pub mergeable_state: Option<String>,
    /// Whether the PR was already merged
    pub is_merged: bool,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Squash all commits into one
    Squash,
    /// Create a merge commit
    Merge,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

/// Parameters of a merge call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Title of the resulting commit
    pub commit_title: String,
    /// Body of the resulting commit
    pub commit_message: String,
    /// Merge method
    pub method: MergeMethod,
    /// Head SHA the merge is pinned to; GitHub refuses the merge if the head moved
    pub sha: String,
}

/// Result of a merge operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}
