//! Runtime configuration: `gitrat.toml`, then `GITRAT_*` variables, then flags

use std::path::{Path, PathBuf};

use anyhow::Context;
use gitrat_core::{CACHE_DIR, DEFAULT_DATASET};
use serde::Deserialize;

/// Config file looked up in the root when `--config` is not given.
pub const CONFIG_FILE: &str = "gitrat.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Relative paths are resolved against `--root`.
    pub cache_dir: PathBuf,
    pub dataset: String,
    pub open: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8090,
            cache_dir: PathBuf::from(CACHE_DIR),
            dataset: DEFAULT_DATASET.to_string(),
            open: false,
        }
    }
}

impl Config {
    /// Load the config file, then apply environment overrides. An explicit
    /// `path` must exist; the default `gitrat.toml` under `root` is optional.
    pub fn load(root: &Path, path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = root.join(CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(&default)?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(host) = lookup("GITRAT_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("GITRAT_PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("GITRAT_PORT is not a port: {port}"))?;
        }
        if let Some(dir) = lookup("GITRAT_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(dataset) = lookup("GITRAT_DATASET") {
            self.dataset = dataset;
        }
        if let Some(open) = lookup("GITRAT_OPEN") {
            self.open = matches!(open.as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    /// Cache directory resolved against `root`.
    pub fn cache_path(&self, root: &Path) -> PathBuf {
        root.join(&self.cache_dir)
    }
}
