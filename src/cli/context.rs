//! Shared setup for an automerge run
//!
//! Resolves credentials, loads the policy, and builds the platform service
//! and the gate from command-line arguments.

use super::Args;
use feedstock_automerge::auth::get_github_auth;
use feedstock_automerge::error::Result;
use feedstock_automerge::gate::AutomergeGate;
use feedstock_automerge::platform::{GitHubService, PlatformService};
use feedstock_automerge::policy::{AppveyorSuppression, PolicyConfig};
use feedstock_automerge::types::RepoConfig;
use tracing::debug;

/// Everything an automerge run needs
pub struct CommandContext {
    /// Platform service bound to the target repository
    pub platform: Box<dyn PlatformService>,
    /// Gate configured from the policy
    pub gate: AutomergeGate,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(args: &Args) -> Result<Self> {
        let repo: RepoConfig = args.repo.parse()?;

        let policy = match &args.policy {
            Some(path) => PolicyConfig::load(path)?,
            None => PolicyConfig::default(),
        };
        debug!(?policy, "loaded policy");

        let auth = get_github_auth()?;
        debug!(source = auth.source, "using GitHub token");

        let platform = GitHubService::new(&auth.token, repo, args.api_url.as_deref())?;

        let mut gate = AutomergeGate::new(policy);
        if let Some(dir) = &args.feedstock_dir {
            gate = gate.with_status_suppression(AppveyorSuppression::new(dir));
        }

        Ok(Self {
            platform: Box::new(platform),
            gate,
        })
    }
}
