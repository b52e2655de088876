//! Command-line interface

mod context;

use anyhow::Context as _;
use clap::Parser;
use context::CommandContext;
use feedstock_automerge::evaluate_and_maybe_merge;
use feedstock_automerge::gate::GateOutcome;
use std::path::PathBuf;
use tracing::info;

/// Automerge bot pull requests on conda-forge feedstocks
#[derive(Debug, Parser)]
#[command(name = "automerge", version, about)]
pub struct Args {
    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: String,

    /// Pull request number
    #[arg(long)]
    pub pr: u64,

    /// TOML file overriding the default policy
    #[arg(long, value_name = "PATH")]
    pub policy: Option<PathBuf>,

    /// Feedstock checkout; enables ignoring Appveyor when conda-forge.yml doesn't use it
    #[arg(long, value_name = "DIR")]
    pub feedstock_dir: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Evaluate the policy but never merge
    #[arg(long)]
    pub dry_run: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run one automerge evaluation
pub async fn run(args: Args) -> anyhow::Result<()> {
    let ctx = CommandContext::new(&args)?;
    let repo = ctx.platform.config().clone();

    let pr = ctx
        .platform
        .get_pull_request(args.pr)
        .await
        .with_context(|| format!("failed to fetch PR {} on {repo}", args.pr))?;

    if args.dry_run {
        match ctx.gate.evaluate(ctx.platform.as_ref(), &pr).await? {
            GateOutcome::Eligible => {
                info!("DRY RUN: would merge PR {} on {repo}", pr.number);
            }
            GateOutcome::Rejected(reason) => {
                info!("DRY RUN: would not merge PR {} on {repo}: {reason}", pr.number);
            }
        }
        return Ok(());
    }

    evaluate_and_maybe_merge(&ctx.gate, ctx.platform.as_ref(), &pr)
        .await
        .with_context(|| format!("automerge of PR {} on {repo} failed", pr.number))?;
    Ok(())
}
