//! Merge execution and the end-to-end automerge entry point
//!
//! [`evaluate_and_maybe_merge`] runs the gate, merges if it passes, and
//! logs exactly one summary line either way.

use crate::error::Result;
use crate::gate::{AutomergeGate, GateOutcome};
use crate::platform::PlatformService;
use crate::policy::PolicyConfig;
use crate::types::{MergeRequest, PullRequest};
use tracing::info;

/// Reason reported after a successful merge
pub const MERGED_REASON: &str = "all is well :)";

/// Final result of an automerge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomergeOutcome {
    /// Whether the PR was merged by this run
    pub did_merge: bool,
    /// Why (or why not)
    pub reason: String,
}

impl AutomergeOutcome {
    /// The PR was merged
    pub fn merged() -> Self {
        Self {
            did_merge: true,
            reason: MERGED_REASON.to_string(),
        }
    }

    /// The PR was left alone
    pub fn not_merged(reason: impl Into<String>) -> Self {
        Self {
            did_merge: false,
            reason: reason.into(),
        }
    }
}

/// Build the merge call for `pr`: policy merge method, PR title as commit
/// title, pinned to the head SHA
pub fn merge_request_for(pr: &PullRequest, policy: &PolicyConfig) -> MergeRequest {
    MergeRequest {
        commit_title: pr.title.clone(),
        commit_message: policy.commit_message.clone(),
        method: policy.merge_method,
        sha: pr.head_sha.clone(),
    }
}

/// Merge `pr` (EFFECTFUL)
///
/// A merge the API declines becomes a not-merged outcome carrying the
/// server's message.
pub async fn execute_merge(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    policy: &PolicyConfig,
) -> Result<AutomergeOutcome> {
    let request = merge_request_for(pr, policy);
    let result = platform.merge_pr(pr.number, &request).await?;

    if result.merged {
        Ok(AutomergeOutcome::merged())
    } else {
        Ok(AutomergeOutcome::not_merged(format!(
            "PR could not be merged: message {}",
            result.message.as_deref().unwrap_or("None")
        )))
    }
}

/// Evaluate `pr` against the gate and merge it if every rule passes.
///
/// Policy rejections and declined merges come back as
/// `Ok(AutomergeOutcome { did_merge: false, .. })`. Errors (API failures
/// after retrying, unreadable workspace config) abort without a summary line.
pub async fn evaluate_and_maybe_merge(
    gate: &AutomergeGate,
    platform: &dyn PlatformService,
    pr: &PullRequest,
) -> Result<AutomergeOutcome> {
    let outcome = match gate.evaluate(platform, pr).await? {
        GateOutcome::Eligible => execute_merge(platform, pr, gate.policy()).await?,
        GateOutcome::Rejected(reason) => AutomergeOutcome::not_merged(reason),
    };

    let repo = platform.config();
    if outcome.did_merge {
        info!("MERGED PR {} on {}: {}", pr.number, repo, outcome.reason);
    } else {
        info!("DID NOT MERGE PR {} on {}: {}", pr.number, repo, outcome.reason);
    }

    Ok(outcome)
}
