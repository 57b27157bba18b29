//! prepwise configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level prepwise configuration, read from `prepwise.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepwiseConfig {
    /// Directory holding saved sessions and evaluations.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    /// Question bank file or directory.
    #[serde(default = "default_question_bank")]
    pub question_bank: PathBuf,
    /// Max submissions evaluated concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Page size for `prepwise history`.
    #[serde(default = "default_page_size")]
    pub history_page_size: usize,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("./prepwise-data")
}
fn default_question_bank() -> PathBuf {
    PathBuf::from("./question-banks")
}
fn default_parallelism() -> usize {
    4
}
fn default_page_size() -> usize {
    crate::history::DEFAULT_LIMIT
}

impl Default for PrepwiseConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            question_bank: default_question_bank(),
            parallelism: default_parallelism(),
            history_page_size: default_page_size(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when `path` is `None`:
/// 1. `prepwise.toml` in the current directory
/// 2. `~/.config/prepwise/config.toml`
///
/// Environment variable overrides: `PREPWISE_STORE_DIR`, `PREPWISE_QUESTION_BANK`.
pub fn load_config_from(path: Option<&Path>) -> Result<PrepwiseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("prepwise.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => PrepwiseConfig::default(),
    };

    if let Ok(dir) = std::env::var("PREPWISE_STORE_DIR") {
        config.store_dir = PathBuf::from(dir);
    }
    if let Ok(bank) = std::env::var("PREPWISE_QUESTION_BANK") {
        config.question_bank = PathBuf::from(bank);
    }

    config.store_dir = resolve_path(&config.store_dir);
    config.question_bank = resolve_path(&config.question_bank);

    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");
    anyhow::ensure!(
        config.history_page_size >= 1,
        "history_page_size must be at least 1"
    );

    Ok(config)
}

/// Parse a config document.
pub fn parse_config(content: &str) -> Result<PrepwiseConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("prepwise"))
}
