//! Commit status aggregation

use super::{Aggregation, Pending, StateClasses, reduce, state_label};
use crate::types::CommitStatus;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Rejection reason when any kept status is failing or still pending
pub const BAD_STATUSES_REASON: &str = "PR has bad or in progress statuses";

/// Reduce commit statuses to one state per context, then to a verdict.
///
/// Contexts in `ignored` are dropped before anything else. For every other
/// context only the record with the latest `updated_at` counts; on equal
/// timestamps the one seen last in `statuses` wins. GitHub does not promise
/// a stable listing order, so ties are not deterministic across calls.
///
/// A pending context always fails the aggregate, even when it is the only
/// one kept.
pub fn aggregate_statuses<'a>(
    statuses: impl IntoIterator<Item = &'a CommitStatus>,
    ignored: &[String],
    classes: &StateClasses,
) -> Aggregation {
    let mut latest: HashMap<&str, &CommitStatus> = HashMap::new();

    for status in statuses {
        if ignored.iter().any(|i| i == &status.context) {
            continue;
        }
        latest
            .entry(status.context.as_str())
            .and_modify(|current| {
                if status.updated_at >= current.updated_at {
                    *current = status;
                }
            })
            .or_insert(status);
    }

    let states: BTreeMap<String, Option<bool>> = latest
        .into_iter()
        .map(|(context, status)| (context.to_string(), classify(&status.state, classes)))
        .collect();

    for (context, state) in &states {
        info!(context = %context, state = state_label(*state), "status");
    }

    Aggregation {
        verdict: reduce(&states, Pending::Blocks, BAD_STATUSES_REASON),
        states,
    }
}

fn classify(state: &str, classes: &StateClasses) -> Option<bool> {
    if classes.neutral.iter().any(|s| s == state) {
        None
    } else if classes.bad.iter().any(|s| s == state) {
        Some(false)
    } else {
        Some(true)
    }
}
