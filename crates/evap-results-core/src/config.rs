//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level evap-results configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsConfig {
    /// Language code used for export headers and filenames.
    #[serde(default = "default_language")]
    pub language: String,
    /// Minimum number of voters before grades are published.
    #[serde(default = "default_min_voter_count")]
    pub min_voter_count: u32,
    /// Minimum share of participants that must have voted.
    #[serde(default = "default_min_voter_percentage")]
    pub min_voter_percentage: f64,
    /// Directory export files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_language() -> String {
    "en".to_string()
}
fn default_min_voter_count() -> u32 {
    2
}
fn default_min_voter_percentage() -> f64 {
    0.2
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./evap-results-export")
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            min_voter_count: default_min_voter_count(),
            min_voter_percentage: default_min_voter_percentage(),
            output_dir: default_output_dir(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `evap-results.toml` in the current directory
/// 2. `~/.config/evap-results/config.toml`
///
/// `EVAP_RESULTS_LANGUAGE` overrides the configured language.
pub fn load_config_from(path: Option<&Path>) -> Result<ResultsConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("evap-results.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => ResultsConfig::default(),
    };

    if let Ok(language) = std::env::var("EVAP_RESULTS_LANGUAGE") {
        if !language.trim().is_empty() {
            config.language = language.trim().to_string();
        }
    }

    validate(&config)?;
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<ResultsConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<ResultsConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn validate(config: &ResultsConfig) -> Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.min_voter_percentage),
        "min_voter_percentage must be between 0.0 and 1.0"
    );
    anyhow::ensure!(!config.language.is_empty(), "language must not be empty");
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("evap-results"))
}
