//! quizrace configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::parser::SourceOptions;
use crate::session::{SessionConfig, DEFAULT_CHANNEL_CAPACITY, DEFAULT_TIME_LIMIT_SECS};

/// Top-level quizrace configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// CSV file with one `question,answer` pair per row.
    #[serde(default = "default_problems")]
    pub problems: PathBuf,
    /// Session length in whole seconds.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u64,
    /// Whether the first CSV row is a header.
    #[serde(default)]
    pub has_headers: bool,
    /// CSV field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Seed for the question shuffle; random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Directory for JSON reports; none are written when unset.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_problems() -> PathBuf {
    PathBuf::from("problems.csv")
}
fn default_time_limit() -> u64 {
    DEFAULT_TIME_LIMIT_SECS
}
fn default_delimiter() -> char {
    ','
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            problems: default_problems(),
            time_limit_secs: default_time_limit(),
            has_headers: false,
            delimiter: default_delimiter(),
            seed: None,
            output_dir: None,
        }
    }
}

impl QuizConfig {
    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.time_limit_secs >= 1,
            "time limit must be at least 1 second"
        );
        anyhow::ensure!(
            self.delimiter.is_ascii(),
            "delimiter must be a single ASCII character, got {:?}",
            self.delimiter
        );
        Ok(())
    }

    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            has_headers: self.has_headers,
            delimiter: self.delimiter as u8,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            time_limit_secs: self.time_limit_secs,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizrace.toml` in the current directory
/// 2. `~/.config/quizrace/config.toml`
///
/// Environment variable overrides: `QUIZRACE_PROBLEMS`, `QUIZRACE_TIME_LIMIT`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizrace.toml");
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
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    Ok(config)
}

fn apply_env_overrides(
    config: &mut QuizConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(problems) = var("QUIZRACE_PROBLEMS") {
        config.problems = PathBuf::from(problems);
    }

    if let Some(limit) = var("QUIZRACE_TIME_LIMIT") {
        config.time_limit_secs = limit
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZRACE_TIME_LIMIT: '{limit}'"))?;
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrace"))
}
