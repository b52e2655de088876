//! Pluggable policy hooks
//!
//! Two policy shapes are in use: opt-in by title slug or by label, and with
//! or without dropping Appveyor's status when the feedstock no longer builds
//! there. Each shape is one implementation of a hook trait.

use crate::error::Result;
use crate::types::{PullRequest, RepoConfig};
use crate::workspace::{APPVEYOR_STATUS_CONTEXT, load_conda_forge_config};
use std::path::PathBuf;
use tracing::{debug, info};

/// Decides whether a PR opted in to automerge
pub trait MarkerRule: Send + Sync {
    /// `Err(reason)` if the PR is not marked
    fn check(&self, pr: &PullRequest) -> std::result::Result<(), String>;
}

/// Opt-in by a slug somewhere in the title
#[derive(Debug, Clone)]
pub struct TitleMarker {
    slug: String,
}

impl TitleMarker {
    /// Create a title rule
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }
}

impl MarkerRule for TitleMarker {
    fn check(&self, pr: &PullRequest) -> std::result::Result<(), String> {
        if pr.title.contains(&self.slug) {
            Ok(())
        } else {
            Err(format!(
                "PR does not have the '{}' slug in the title",
                self.slug
            ))
        }
    }
}

/// Opt-in by label
#[derive(Debug, Clone)]
pub struct LabelMarker {
    labels: Vec<String>,
}

impl LabelMarker {
    /// Create a label rule accepting any of `labels`
    pub const fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

impl MarkerRule for LabelMarker {
    fn check(&self, pr: &PullRequest) -> std::result::Result<(), String> {
        if pr.labels.iter().any(|l| self.labels.contains(l)) {
            Ok(())
        } else {
            Err("PR does not have an automerge label".to_string())
        }
    }
}

/// Supplies status contexts to ignore on top of the configured ones
pub trait StatusSuppression: Send + Sync {
    /// Extra contexts to ignore for `repo`
    fn extra_ignored_statuses(&self, repo: &RepoConfig) -> Result<Vec<String>>;
}

/// No extra contexts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuppression;

impl StatusSuppression for NoSuppression {
    fn extra_ignored_statuses(&self, _repo: &RepoConfig) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Ignore Appveyor's status unless the feedstock still builds Windows there
///
/// Feedstocks that moved off Appveyor keep a stale webhook for a while, and
/// its status would otherwise block every merge.
#[derive(Debug, Clone)]
pub struct AppveyorSuppression {
    feedstock_dir: PathBuf,
}

impl AppveyorSuppression {
    /// Read `conda-forge.yml` from the checkout at `feedstock_dir`
    pub fn new(feedstock_dir: impl Into<PathBuf>) -> Self {
        Self {
            feedstock_dir: feedstock_dir.into(),
        }
    }
}

impl StatusSuppression for AppveyorSuppression {
    fn extra_ignored_statuses(&self, repo: &RepoConfig) -> Result<Vec<String>> {
        let uses_appveyor = load_conda_forge_config(&self.feedstock_dir)?
            .is_some_and(|cfg| cfg.uses_appveyor());

        if uses_appveyor {
            debug!(repo = %repo, "feedstock builds on appveyor, keeping its status");
            Ok(Vec::new())
        } else {
            info!(repo = %repo, context = APPVEYOR_STATUS_CONTEXT, "ignoring appveyor status");
            Ok(vec![APPVEYOR_STATUS_CONTEXT.to_string()])
        }
    }
}
