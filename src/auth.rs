//! GitHub token discovery
//!
//! The bot's action passes its token as `INPUT_REPO-TOKEN`; local runs use
//! the same variables as the `gh` CLI.

use crate::error::{Error, Result};
use std::env;

/// Variables checked for a token, in order
pub const TOKEN_ENV_VARS: [&str; 3] = ["INPUT_REPO-TOKEN", "GH_TOKEN", "GITHUB_TOKEN"];

/// GitHub authentication configuration
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Variable the token came from
    pub source: &'static str,
}

/// Get GitHub authentication from the environment
///
/// The first non-empty variable in [`TOKEN_ENV_VARS`] wins.
pub fn get_github_auth() -> Result<GitHubAuthConfig> {
    TOKEN_ENV_VARS
        .iter()
        .find_map(|&var| {
            env::var(var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|token| GitHubAuthConfig { token, source: var })
        })
        .ok_or_else(|| {
            Error::Auth(format!(
                "no GitHub token found; set one of {}",
                TOKEN_ENV_VARS.join(", ")
            ))
        })
}
