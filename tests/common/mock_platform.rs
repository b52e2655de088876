//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use feedstock_automerge::error::{Error, Result};
use feedstock_automerge::platform::PlatformService;
use feedstock_automerge::types::{
    CheckRun, CommitStatus, MergeRequest, MergeResult, PullRequest, RepoConfig,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub request: MergeRequest,
}

/// Simple mock platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall,
/// so call history can be inspected after the fact.
///
/// Features:
/// - Configurable statuses, check runs and merge result
/// - Call tracking for verification
/// - Error injection, including N transient check-run failures
pub struct MockPlatformService {
    config: RepoConfig,
    pull_request: Mutex<Option<PullRequest>>,
    statuses: Mutex<Vec<CommitStatus>>,
    check_runs: Mutex<Vec<CheckRun>>,
    merge_response: Mutex<MergeResult>,
    // Call tracking
    get_pr_calls: Mutex<Vec<u64>>,
    list_statuses_calls: Mutex<Vec<String>>,
    list_check_runs_calls: Mutex<Vec<String>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    // Error injection
    error_on_list_statuses: Mutex<Option<String>>,
    check_run_failures: Mutex<VecDeque<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: RepoConfig) -> Self {
        Self {
            config,
            pull_request: Mutex::new(None),
            statuses: Mutex::new(Vec::new()),
            check_runs: Mutex::new(Vec::new()),
            merge_response: Mutex::new(MergeResult {
                merged: true,
                sha: Some("merge_sha".to_string()),
                message: Some("Pull Request successfully merged".to_string()),
            }),
            get_pr_calls: Mutex::new(Vec::new()),
            list_statuses_calls: Mutex::new(Vec::new()),
            list_check_runs_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            error_on_list_statuses: Mutex::new(None),
            check_run_failures: Mutex::new(VecDeque::new()),
            error_on_merge_pr: Mutex::new(None),
        }
    }

    /// Create a mock bound to `conda-forge/foo-feedstock`
    pub fn new() -> Self {
        Self::with_config(RepoConfig::new("conda-forge", "foo-feedstock"))
    }

    // === Response setup ===

    /// Set the response for `get_pull_request`
    pub fn set_pull_request(&self, pr: PullRequest) {
        *self.pull_request.lock().unwrap() = Some(pr);
    }

    /// Set the response for `list_commit_statuses`
    pub fn set_statuses(&self, statuses: Vec<CommitStatus>) {
        *self.statuses.lock().unwrap() = statuses;
    }

    /// Set the response for `list_check_runs`
    pub fn set_check_runs(&self, runs: Vec<CheckRun>) {
        *self.check_runs.lock().unwrap() = runs;
    }

    /// Set the response for `merge_pr`
    pub fn set_merge_response(&self, result: MergeResult) {
        *self.merge_response.lock().unwrap() = result;
    }

    // === Error injection methods ===

    /// Make `list_commit_statuses` return an error
    pub fn fail_list_statuses(&self, msg: &str) {
        *self.error_on_list_statuses.lock().unwrap() = Some(msg.to_string());
    }

    /// Make the next `times` calls to `list_check_runs` fail
    pub fn fail_check_runs(&self, times: usize, msg: &str) {
        let mut failures = self.check_run_failures.lock().unwrap();
        for i in 1..=times {
            failures.push_back(format!("{msg} #{i}"));
        }
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    pub fn get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    pub fn list_statuses_calls(&self) -> Vec<String> {
        self.list_statuses_calls.lock().unwrap().clone()
    }

    pub fn list_check_runs_calls(&self) -> Vec<String> {
        self.list_check_runs_calls.lock().unwrap().clone()
    }

    pub fn merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Total number of API calls that touched statuses, checks or merging
    pub fn network_call_count(&self) -> usize {
        self.list_statuses_calls.lock().unwrap().len()
            + self.list_check_runs_calls.lock().unwrap().len()
            + self.merge_pr_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    fn config(&self) -> &RepoConfig {
        &self.config
    }

    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest> {
        self.get_pr_calls.lock().unwrap().push(pr_number);
        self.pull_request
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::GitHubApi(format!("PR {pr_number} not found")))
    }

    async fn list_commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        self.list_statuses_calls.lock().unwrap().push(sha.to_string());
        if let Some(msg) = self.error_on_list_statuses.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }
        Ok(self.statuses.lock().unwrap().clone())
    }

    async fn list_check_runs(&self, sha: &str) -> Result<Vec<CheckRun>> {
        self.list_check_runs_calls.lock().unwrap().push(sha.to_string());
        if let Some(msg) = self.check_run_failures.lock().unwrap().pop_front() {
            return Err(Error::GitHubApi(msg));
        }
        Ok(self.check_runs.lock().unwrap().clone())
    }

    async fn merge_pr(&self, pr_number: u64, request: &MergeRequest) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr_number,
            request: request.clone(),
        });
        if let Some(msg) = self.error_on_merge_pr.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }
        Ok(self.merge_response.lock().unwrap().clone())
    }
}
