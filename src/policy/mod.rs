//! Automerge policy configuration
//!
//! [`PolicyConfig`] is built once per run and never mutated. Defaults
//! reproduce the policy the autotick bot runs with; a TOML file can override
//! any subset of fields.

mod hooks;

pub use hooks::{
    AppveyorSuppression, LabelMarker, MarkerRule, NoSuppression, StatusSuppression, TitleMarker,
};

use crate::aggregate::StateClasses;
use crate::error::{Error, Result};
use crate::types::MergeMethod;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default title slug marking a PR as eligible
pub const DEFAULT_TITLE_SLUG: &str = "[bot-automerge]";

/// Default commit message for automerged PRs
pub const DEFAULT_COMMIT_MESSAGE: &str = "automerged PR by regro-cf-autotick-bot-action";

/// How a PR opts in to automerge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkerConfig {
    /// The title must contain `slug`
    Title {
        /// Marker text, matched as a substring
        slug: String,
    },
    /// The PR must carry one of `labels`
    Label {
        /// Accepted label names
        labels: Vec<String>,
    },
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self::Title {
            slug: DEFAULT_TITLE_SLUG.to_string(),
        }
    }
}

impl MarkerConfig {
    /// Build the rule this configuration describes
    pub fn rule(&self) -> Box<dyn MarkerRule> {
        match self {
            Self::Title { slug } => Box::new(TitleMarker::new(slug.clone())),
            Self::Label { labels } => Box::new(LabelMarker::new(labels.clone())),
        }
    }
}

/// Policy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Logins allowed to have their PRs automerged
    pub allowed_users: Vec<String>,
    /// Opt-in marker
    pub marker: MarkerConfig,
    /// Status contexts that never count
    pub ignored_statuses: Vec<String>,
    /// Check names that never count
    pub ignored_checks: Vec<String>,
    /// Raw state classification
    pub states: StateClasses,
    /// `mergeable_state` values that allow a merge
    pub good_merge_states: Vec<String>,
    /// How the PR is merged
    pub merge_method: MergeMethod,
    /// Body of the merge commit
    pub commit_message: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_users: vec!["regro-cf-autotick-bot".to_string()],
            marker: MarkerConfig::default(),
            ignored_statuses: vec!["conda-forge-linter".to_string()],
            ignored_checks: vec!["regro-cf-autotick-bot-action".to_string()],
            states: StateClasses::default(),
            good_merge_states: ["clean", "has_hooks", "unknown", "unstable"]
                .into_iter()
                .map(String::from)
                .collect(),
            merge_method: MergeMethod::Squash,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }
}

impl PolicyConfig {
    /// Parse a TOML policy; missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid policy: {e}")))
    }

    /// Load a TOML policy file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Whether `login` may have PRs automerged
    pub fn is_allowed_user(&self, login: &str) -> bool {
        self.allowed_users.iter().any(|u| u == login)
    }

    /// Whether a `mergeable_state` allows merging
    pub fn is_good_merge_state(&self, state: &str) -> bool {
        self.good_merge_states.iter().any(|s| s == state)
    }
}
