use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Collocation window size: tokens recorded on each side of a match
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Heuristics for surfacing novel variants
    #[serde(default)]
    pub heuristics: HeuristicsConfig,

    /// Root directory for persisted dictionaries and sessions;
    /// resolved against the platform data dir when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Heuristics that decide whether an unmatched token is surfaced as a
/// novel variant candidate.
///
/// The original workflow left these informal; here they are explicit so
/// a corpus can tune them instead of re-guessing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HeuristicsConfig {
    /// Surface capitalization marks a candidate
    #[serde(default = "default_true")]
    pub capitalized: bool,

    /// Name-formation affixes (folded spelling); matches on affix alone
    /// are flagged low-confidence
    #[serde(default)]
    pub name_affixes: Vec<String>,

    /// Minimum surface length for a candidate, in characters
    #[serde(default = "default_min_surface_len")]
    pub min_surface_len: usize,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            capitalized: true,
            name_affixes: Vec::new(),
            min_surface_len: default_min_surface_len(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_window_size() -> usize {
    6
}

fn default_min_surface_len() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file, or fall back to defaults when it does
    /// not exist.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the data directory: explicit setting first, then the
    /// platform data dir, then the current directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("onoma"))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(anyhow!("window_size must be at least 1"));
        }
        if self.heuristics.min_surface_len == 0 {
            return Err(anyhow!("heuristics.min_surface_len must be at least 1"));
        }
        if self.heuristics.name_affixes.iter().any(|a| a.trim().is_empty()) {
            return Err(anyhow!("heuristics.name_affixes must not contain empty entries"));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            window_size: default_window_size(),
            heuristics: HeuristicsConfig::default(),
            data_dir: None,
            log_level: LogLevel::default(),
        }
    }
}
