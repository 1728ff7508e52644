use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "fnt.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory of the blob store.
    pub store_root: PathBuf,
    /// Project the commands operate on.
    pub project_id: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from(".fnt-store"),
            project_id: 1,
        }
    }
}

impl CliConfig {
    /// Read `path`, or `fnt.toml` if it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::read(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Command-line flags win over file values.
    pub fn apply_overrides(&mut self, store_root: Option<PathBuf>, project_id: Option<u64>) {
        if let Some(store_root) = store_root {
            self.store_root = store_root;
        }
        if let Some(project_id) = project_id {
            self.project_id = project_id;
        }
    }
}
