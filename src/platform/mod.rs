//! Platform services for the forge hosting the feedstock
//!
//! The policy gate only ever talks to [`PlatformService`]; the GitHub
//! implementation lives in [`GitHubService`].

mod github;

pub use github::{DEFAULT_API_URL, GitHubService};

use crate::error::Result;
use crate::types::{CheckRun, CommitStatus, MergeRequest, MergeResult, PullRequest, RepoConfig};
use async_trait::async_trait;

/// Platform service trait for the operations automerge needs
///
/// Each method is a single request (or a single paginated listing). Retrying
/// is the caller's business; see [`crate::retry`].
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Repository this service is bound to
    fn config(&self) -> &RepoConfig;

    /// Fetch a pull request snapshot
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest>;

    /// List every commit status posted for `sha`, across all pages
    async fn list_commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>>;

    /// List check runs for `sha`
    ///
    /// A non-2xx response is an error.
    async fn list_check_runs(&self, sha: &str) -> Result<Vec<CheckRun>>;

    /// Merge a PR
    ///
    /// A merge the API refuses (head moved, not mergeable) comes back as
    /// `Ok(MergeResult { merged: false, .. })`; only transport failures are
    /// errors.
    async fn merge_pr(&self, pr_number: u64, request: &MergeRequest) -> Result<MergeResult>;
}
