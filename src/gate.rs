//! Policy gate - decides whether a PR may be automerged
//!
//! Rules run in a fixed order and the first one that fails decides the
//! outcome:
//! 1. author is allow-listed
//! 2. PR carries the opt-in marker
//! 3. PR is not merged yet
//! 4. commit statuses are not failing
//! 5. check runs are not failing
//! 6. at least one of statuses/checks produced a signal
//! 7. GitHub considers the PR mergeable
//!
//! Rules 1-3 only look at the PR snapshot, so a rejected author or an
//! unmarked PR never costs an API call.

use crate::aggregate::{Verdict, aggregate_check_runs, aggregate_statuses};
use crate::error::Result;
use crate::platform::PlatformService;
use crate::policy::{MarkerRule, NoSuppression, PolicyConfig, StatusSuppression};
use crate::retry::{Jitter, RandomJitter, RetryPolicy, Sleeper, TokioSleeper, fetch_check_runs};
use crate::types::PullRequest;
use tracing::debug;

/// Rejection reason when neither API reported anything usable
pub const NO_SIGNAL_REASON: &str = "No checks or statuses have returned success";

/// Rejection reason for PRs that are already merged
pub const ALREADY_MERGED_REASON: &str = "PR has already been merged";

/// What the gate decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Every rule passed
    Eligible,
    /// A rule failed
    Rejected(String),
}

/// The automerge policy gate
///
/// Built once per run from an immutable [`PolicyConfig`]. The marker rule
/// and the status suppression hook default to what the config describes
/// and can be swapped out, as can the retry timing.
pub struct AutomergeGate {
    policy: PolicyConfig,
    marker: Box<dyn MarkerRule>,
    suppression: Box<dyn StatusSuppression>,
    retry: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
    jitter: Box<dyn Jitter>,
}

impl AutomergeGate {
    /// Create a gate for `policy` with real sleeping and random jitter
    pub fn new(policy: PolicyConfig) -> Self {
        let marker = policy.marker.rule();
        Self {
            policy,
            marker,
            suppression: Box::new(NoSuppression),
            retry: RetryPolicy::default(),
            sleeper: Box::new(TokioSleeper),
            jitter: Box::new(RandomJitter),
        }
    }

    /// Replace the opt-in marker rule
    #[must_use]
    pub fn with_marker_rule(mut self, rule: impl MarkerRule + 'static) -> Self {
        self.marker = Box::new(rule);
        self
    }

    /// Set the hook supplying extra ignored status contexts
    #[must_use]
    pub fn with_status_suppression(mut self, hook: impl StatusSuppression + 'static) -> Self {
        self.suppression = Box::new(hook);
        self
    }

    /// Set the retry policy for the check-run fetch
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set how backoff waits are slept
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Set the randomness used for backoff waits
    #[must_use]
    pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    /// The policy this gate enforces
    pub const fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Run every rule against `pr`.
    ///
    /// Rejections are `Ok(GateOutcome::Rejected(..))`. Errors mean the
    /// evaluation itself failed (API down after retries, bad config file).
    pub async fn evaluate(
        &self,
        platform: &dyn PlatformService,
        pr: &PullRequest,
    ) -> Result<GateOutcome> {
        if !self.policy.is_allowed_user(&pr.author) {
            return Ok(rejected(format!("user {} cannot automerge", pr.author)));
        }

        if let Err(reason) = self.marker.check(pr) {
            return Ok(rejected(reason));
        }

        if pr.is_merged {
            return Ok(rejected(ALREADY_MERGED_REASON));
        }

        let mut ignored_statuses = self.policy.ignored_statuses.clone();
        ignored_statuses.extend(self.suppression.extra_ignored_statuses(platform.config())?);

        let statuses = platform.list_commit_statuses(&pr.head_sha).await?;
        let status_res = aggregate_statuses(&statuses, &ignored_statuses, &self.policy.states);
        if let Verdict::Fail(reason) = &status_res.verdict {
            return Ok(rejected(reason.as_str()));
        }

        let checks = fetch_check_runs(
            platform,
            &pr.head_sha,
            &self.retry,
            self.sleeper.as_ref(),
            self.jitter.as_ref(),
        )
        .await?;
        let checks_res =
            aggregate_check_runs(&checks.value, &self.policy.ignored_checks, &self.policy.states);
        if let Verdict::Fail(reason) = &checks_res.verdict {
            return Ok(rejected(reason.as_str()));
        }

        if status_res.verdict == Verdict::Indeterminate
            && checks_res.verdict == Verdict::Indeterminate
        {
            return Ok(rejected(NO_SIGNAL_REASON));
        }

        let good_state = pr
            .mergeable_state
            .as_deref()
            .is_some_and(|s| self.policy.is_good_merge_state(s));
        if pr.mergeable != Some(true) || !good_state {
            return Ok(rejected(format!(
                "PR merge issue: mergeable|mergeable_state = {}|{}",
                display_flag(pr.mergeable),
                pr.mergeable_state.as_deref().unwrap_or("None")
            )));
        }

        debug!(pr_number = pr.number, "all automerge rules passed");
        Ok(GateOutcome::Eligible)
    }
}

fn rejected(reason: impl Into<String>) -> GateOutcome {
    GateOutcome::Rejected(reason.into())
}

/// Render a tri-state flag the way the bot's reason strings always have
const fn display_flag(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "True",
        Some(false) => "False",
        None => "None",
    }
}
