//! Signal aggregation for commit statuses and check runs
//!
//! Both aggregators are pure: records go in, an [`Aggregation`] comes out.
//! Per-name resolution differs between the two APIs, and so does the way a
//! still-pending entry counts:
//! - statuses: no entries → [`Verdict::Indeterminate`]; any entry failed or
//!   pending → [`Verdict::Fail`]; otherwise [`Verdict::Pass`]
//! - check runs: no entries, or every entry still pending →
//!   [`Verdict::Indeterminate`]; any entry failed, or pending alongside
//!   resolved ones → [`Verdict::Fail`]; otherwise [`Verdict::Pass`]

mod checks;
mod status;

pub use checks::{FAILING_CHECKS_REASON, aggregate_check_runs};
pub use status::{BAD_STATUSES_REASON, aggregate_statuses};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overall verdict of one aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every kept entry passed
    Pass,
    /// At least one kept entry failed or is still running
    Fail(String),
    /// Nothing to judge: no kept entries, or none resolved yet
    Indeterminate,
}

/// Result of an aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Overall verdict
    pub verdict: Verdict,
    /// Resolved state per context/check name, for diagnostics only
    pub states: BTreeMap<String, Option<bool>>,
}

/// Which raw states fall in which class
///
/// Anything not listed as neutral or bad counts as success-like, so states
/// GitHub adds later (`neutral`, `skipped`, ...) pass by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateClasses {
    /// Commit-status states that mean "not finished yet"
    pub neutral: Vec<String>,
    /// Commit-status states that mean failure
    pub bad: Vec<String>,
    /// Check-run conclusions that mean failure
    pub bad_conclusions: Vec<String>,
}

impl Default for StateClasses {
    fn default() -> Self {
        Self {
            neutral: vec!["pending".to_string()],
            bad: vec!["failure".to_string(), "error".to_string()],
            bad_conclusions: vec!["failure".to_string(), "error".to_string()],
        }
    }
}

/// How entries that have not resolved yet count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    /// Any pending entry fails the aggregate
    Blocks,
    /// Pending entries only fail next to resolved ones
    Waits,
}

fn reduce(
    states: &BTreeMap<String, Option<bool>>,
    pending: Pending,
    fail_reason: &str,
) -> Verdict {
    if states.is_empty() {
        return Verdict::Indeterminate;
    }
    if pending == Pending::Waits && states.values().all(Option::is_none) {
        return Verdict::Indeterminate;
    }
    if states.values().all(|s| *s == Some(true)) {
        Verdict::Pass
    } else {
        Verdict::Fail(fail_reason.to_string())
    }
}

const fn state_label(state: Option<bool>) -> &'static str {
    match state {
        Some(true) => "pass",
        Some(false) => "fail",
        None => "pending",
    }
}
