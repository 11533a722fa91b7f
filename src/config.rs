//! Analyzer configuration.
//!
//! Settings come from a YAML file. `ccm.yaml` or `.ccm.yaml` in the input
//! root wins, then the user-level `config.yaml` in the platform config
//! directory, then the defaults. Command-line flags override whatever was
//! loaded.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::AnalyzerError;

/// File names looked up in the input root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["ccm.yaml", ".ccm.yaml"];

const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Glob patterns for paths to skip, relative to the input root
    /// (e.g. "**/generated/**").
    pub exclude_paths: Vec<String>,
    pub include_test_files: bool,
    /// Files larger than this are not read.
    pub max_file_bytes: u64,
    /// Write `analysis_legacy.json` next to the primary artifact.
    pub legacy_output: bool,
    /// Extract files on the rayon pool.
    pub parallel: bool,
    /// Directory names skipped in addition to the built-in ignore set.
    pub extra_ignore_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_paths: Vec::new(),
            include_test_files: false,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            legacy_output: true,
            parallel: false,
            extra_ignore_dirs: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();
        let config_error = |message: String| AnalyzerError::Config {
            path: path.to_path_buf(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        // An empty file is a valid, all-default config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| config_error(e.to_string()))
    }

    /// Load the config for a run over `root`.
    ///
    /// An explicit path must exist and parse. Discovered files that fail to
    /// parse are errors too; a missing file just means defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, AnalyzerError> {
        if let Some(path) = explicit {
            return Self::parse_file(path);
        }

        match Self::discover(root) {
            Some(path) => {
                debug!(path = %path.display(), "using config file");
                Self::parse_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Find a config file for `root` without reading it.
    pub fn discover(root: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.is_file())
            .or_else(|| user_config_path().filter(|p| p.is_file()))
    }

    /// Compile `exclude_paths` into a matcher. Invalid patterns are skipped
    /// with a warning.
    pub fn exclusion_matcher(&self) -> PathMatcher {
        PathMatcher::new(&self.exclude_paths)
    }
}

/// Platform config directory location of the user-level config file.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "ccm-analyzer")
        .map(|dirs| dirs.config_dir().join("config.yaml"))
}

/// Compiled `exclude_paths` globs.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    set: Option<GlobSet>,
}

impl PathMatcher {
    pub fn new(patterns: &[String]) -> Self {
        if patterns.is_empty() {
            return Self { set: None };
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => tracing::warn!(pattern = %pattern, error = %e, "ignoring invalid exclude pattern"),
            }
        }
        Self {
            set: builder.build().ok(),
        }
    }

    /// Match a path relative to the input root.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.set
            .as_ref()
            .map(|set| set.is_match(relative))
            .unwrap_or(false)
    }
}
