//! feedstock-automerge - policy-gated automerge for bot pull requests
//!
//! Decides whether one pull request on a feedstock repository may be merged
//! automatically, and merges it if so. Commit statuses and check runs are
//! aggregated into verdicts, a fixed sequence of policy rules is applied,
//! and only a PR that passes all of them is squash-merged.
//!
//! The entry point is [`automerge::evaluate_and_maybe_merge`].

pub mod aggregate;
pub mod auth;
pub mod automerge;
pub mod error;
pub mod gate;
pub mod platform;
pub mod policy;
pub mod retry;
pub mod types;
pub mod workspace;

pub use automerge::{AutomergeOutcome, evaluate_and_maybe_merge};
pub use error::{Error, Result};
pub use gate::{AutomergeGate, GateOutcome};
