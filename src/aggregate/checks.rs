//! Check run aggregation

use super::{Aggregation, Pending, StateClasses, reduce, state_label};
use crate::types::CheckRun;
use std::collections::BTreeMap;
use tracing::info;

/// Rejection reason when any kept check is failing or still running
pub const FAILING_CHECKS_REASON: &str = "PR has failing or in progress checks";

/// Reduce check runs to one state per name, then to a verdict.
///
/// A run that has not completed resolves to pending. A completed run fails
/// only if its conclusion is in `classes.bad_conclusions`. If a name shows
/// up more than once the last run in input order wins. If every kept run is
/// still pending the verdict is indeterminate.
pub fn aggregate_check_runs<'a>(
    check_runs: impl IntoIterator<Item = &'a CheckRun>,
    ignored: &[String],
    classes: &StateClasses,
) -> Aggregation {
    let mut states = BTreeMap::new();

    for run in check_runs {
        if ignored.iter().any(|i| i == &run.name) {
            continue;
        }
        let state = if !run.is_completed() {
            None
        } else if run
            .conclusion
            .as_deref()
            .is_some_and(|c| classes.bad_conclusions.iter().any(|b| b == c))
        {
            Some(false)
        } else {
            Some(true)
        };
        states.insert(run.name.clone(), state);
    }

    for (name, state) in &states {
        info!(name = %name, state = state_label(*state), "check");
    }

    Aggregation {
        verdict: reduce(&states, Pending::Waits, FAILING_CHECKS_REASON),
        states,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Verdict;

    fn run(name: &str, status: &str, conclusion: Option<&str>) -> CheckRun {
        CheckRun {
            name: name.to_string(),
            status: status.to_string(),
            conclusion: conclusion.map(String::from),
        }
    }

    fn bot_action() -> Vec<String> {
        vec!["regro-cf-autotick-bot-action".to_string()]
    }

    #[test]
    fn test_no_checks_is_indeterminate() {
        let agg = aggregate_check_runs(&[], &bot_action(), &StateClasses::default());
        assert_eq!(agg.verdict, Verdict::Indeterminate);
    }

    #[test]
    fn test_lone_in_progress_check_is_indeterminate() {
        let runs = vec![run("ci", "in_progress", None)];
        let agg = aggregate_check_runs(&runs, &bot_action(), &StateClasses::default());
        assert_eq!(agg.verdict, Verdict::Indeterminate);
        assert_eq!(agg.states.get("ci"), Some(&None));
    }

    #[test]
    fn test_ignored_check_does_not_count() {
        // The action evaluating this PR shows up as an in-progress check
        let runs = vec![
            run("regro-cf-autotick-bot-action", "in_progress", None),
            run("ci", "completed", Some("success")),
        ];
        let agg = aggregate_check_runs(&runs, &bot_action(), &StateClasses::default());
        assert_eq!(agg.verdict, Verdict::Pass);
        assert_eq!(agg.states.len(), 1);
    }

    #[test]
    fn test_completed_failure_fails() {
        let runs = vec![
            run("linux", "completed", Some("success")),
            run("osx", "completed", Some("failure")),
        ];
        let agg = aggregate_check_runs(&runs, &bot_action(), &StateClasses::default());
        assert_eq!(agg.verdict, Verdict::Fail(FAILING_CHECKS_REASON.to_string()));
    }

    #[test]
    fn test_in_progress_next_to_success_fails() {
        let runs = vec![
            run("linux", "completed", Some("success")),
            run("osx", "queued", None),
        ];
        let agg = aggregate_check_runs(&runs, &[], &StateClasses::default());
        assert_eq!(agg.verdict, Verdict::Fail(FAILING_CHECKS_REASON.to_string()));
    }

    #[test]
    fn test_neutral_and_skipped_conclusions_pass() {
        let runs = vec![
            run("linux", "completed", Some("neutral")),
            run("osx", "completed", Some("skipped")),
        ];
        let agg = aggregate_check_runs(&runs, &[], &StateClasses::default());
        assert_eq!(agg.verdict, Verdict::Pass);
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let runs = vec![
            run("linux", "completed", Some("failure")),
            run("linux", "completed", Some("success")),
        ];
        let agg = aggregate_check_runs(&runs, &[], &StateClasses::default());
        assert_eq!(agg.verdict, Verdict::Pass);
    }
}
