//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{MergePrCall, MockPlatformService};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use feedstock_automerge::gate::AutomergeGate;
use feedstock_automerge::policy::PolicyConfig;
use feedstock_automerge::retry::{Jitter, Sleeper};
use feedstock_automerge::types::{CheckRun, CommitStatus, PullRequest};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Head SHA used by every fixture PR
pub const HEAD_SHA: &str = "6c2b7f0e3a1d4b5c8e9f00112233445566778899";

/// A PR that passes every snapshot-only rule under the default policy
pub fn make_pr() -> PullRequest {
    PullRequest {
        number: 42,
        author: "regro-cf-autotick-bot".to_string(),
        title: "[bot-automerge] foo v1.2.3".to_string(),
        labels: vec![],
        head_sha: HEAD_SHA.to_string(),
        mergeable: Some(true),
        mergeable_state: Some("clean".to_string()),
        is_merged: false,
    }
}

/// A commit status updated `minute` minutes after a fixed instant
pub fn status(context: &str, state: &str, minute: u32) -> CommitStatus {
    CommitStatus {
        context: context.to_string(),
        state: state.to_string(),
        updated_at: at(minute),
    }
}

/// A finished check run
pub fn completed(name: &str, conclusion: &str) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        status: "completed".to_string(),
        conclusion: Some(conclusion.to_string()),
    }
}

/// A check run that has not finished
pub fn running(name: &str) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        status: "in_progress".to_string(),
        conclusion: None,
    }
}

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(minute.into())
}

/// Records requested waits instead of sleeping
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Always picks the top of the backoff window
pub struct CeilingJitter;

impl Jitter for CeilingJitter {
    fn sample(&self, ceiling: Duration) -> Duration {
        ceiling
    }
}

/// Gate with the given policy that never really sleeps
pub fn gate_with(policy: PolicyConfig, sleeper: &RecordingSleeper) -> AutomergeGate {
    AutomergeGate::new(policy)
        .with_sleeper(sleeper.clone())
        .with_jitter(CeilingJitter)
}

/// Default-policy gate that never really sleeps
pub fn test_gate() -> AutomergeGate {
    gate_with(PolicyConfig::default(), &RecordingSleeper::default())
}
