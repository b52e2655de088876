//! Reading feedstock configuration from a checked-out feedstock.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename of the feedstock's CI configuration.
pub const CONDA_FORGE_YML: &str = "conda-forge.yml";

/// Status context Appveyor posts on pull requests.
pub const APPVEYOR_STATUS_CONTEXT: &str = "continuous-integration/appveyor/pr";

/// The subset of `conda-forge.yml` automerge cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CondaForgeConfig {
    /// CI provider per platform; `provider:` with no children reads as unset
    #[serde(default)]
    pub provider: Option<ProviderConfig>,
}

/// `provider:` section of `conda-forge.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Windows provider; unset means the conda-smithy default (Azure)
    pub win: Option<String>,
}

impl CondaForgeConfig {
    /// Parse the contents of a `conda-forge.yml`. An empty file is the default config.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| Error::Workspace(format!("failed to parse {CONDA_FORGE_YML}: {e}")))
    }

    /// Whether Windows builds still run on Appveyor
    pub fn uses_appveyor(&self) -> bool {
        self.provider
            .as_ref()
            .and_then(|p| p.win.as_deref())
            .is_some_and(|p| p.eq_ignore_ascii_case("appveyor"))
    }
}

/// Get path to the feedstock's `conda-forge.yml`.
pub fn conda_forge_yml_path(feedstock_dir: &Path) -> PathBuf {
    feedstock_dir.join(CONDA_FORGE_YML)
}

/// Load `conda-forge.yml` from a feedstock checkout.
///
/// Returns `None` if the file doesn't exist.
pub fn load_conda_forge_config(feedstock_dir: &Path) -> Result<Option<CondaForgeConfig>> {
    let path = conda_forge_yml_path(feedstock_dir);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Workspace(format!("failed to read {}: {e}", path.display())))?;

    CondaForgeConfig::from_yaml_str(&content).map(Some)
}
