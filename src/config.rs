//! Run settings and user exclusion rules.
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! [run]
//! workers = 16
//! report_file = "report.txt"
//!
//! [filters]
//! skip_hidden = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["keep/**", "*.part"]
//! regex = []
//! ```
//!
//! Exclusions add to the built-in ones (category folders and the report
//! file); they never remove them.

use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 16;

/// Default report file name, created directly under the sorted root.
pub const DEFAULT_REPORT_FILE: &str = "report.txt";

/// Errors that can occur during configuration loading and filtering.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax, structure or values.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunSettings,
    #[serde(default)]
    pub filters: FilterRules,
}

/// How a run is executed.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSettings {
    /// Number of worker threads dispatching entries.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Name of the report file written under the root.
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_report_file() -> String {
    DEFAULT_REPORT_FILE.to_string()
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            report_file: default_report_file(),
        }
    }
}

/// Rules deciding which entries are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterRules {
    /// Skip entries whose name starts with a dot.
    #[serde(default)]
    pub skip_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding entries from sorting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    /// Exact file or directory names (e.g. "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the path relative to the root.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the entry name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl Config {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.cleanfolderrc.toml` in the current directory
    /// 3. Look for `~/.config/clean-folder/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any file that is found fails to parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".cleanfolderrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("clean-folder")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.workers == 0 {
            return Err(ConfigError::ConfigInvalid(
                "run.workers must be at least 1".to_string(),
            ));
        }

        let report = Path::new(&self.run.report_file);
        if report.file_name() != Some(OsStr::new(&self.run.report_file)) {
            return Err(ConfigError::ConfigInvalid(format!(
                "run.report_file must be a plain file name, got '{}'",
                self.run.report_file
            )));
        }

        Ok(())
    }

    /// Compile the filter rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

/// Pre-compiled exclusion rules.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    skip_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden: rules.skip_hidden,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Whether an entry, given relative to the root, matches a user exclusion.
    ///
    /// Every component of the path is checked against the name rules, so an
    /// excluded directory also covers everything below it.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        let by_name = relative.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            (self.skip_hidden && name.starts_with('.'))
                || self.exclude_filenames.contains(name.as_ref())
                || self.exclude_regexes.iter().any(|re| re.is_match(&name))
        });

        by_name
            || self
                .exclude_patterns
                .iter()
                .any(|pattern| pattern.matches_path(relative))
    }
}
