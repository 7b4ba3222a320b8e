//! Loader options and project configuration (tiledforge.yaml).
//!
//! ```yaml
//! max_group_depth: 32
//! deny_warnings: true
//! excludes:
//!   - "**/backup/*"
//!   - "*.old.tmx"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TmxError};

/// Name of the configuration file looked up by the CLI.
pub const CONFIG_FILE: &str = "tiledforge.yaml";

/// Default limit on group nesting.
pub const DEFAULT_MAX_GROUP_DEPTH: usize = 64;

/// Options that affect how a single map is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Groups nested deeper than this are skipped with an error diagnostic.
    pub max_group_depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
        }
    }
}

/// Project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_group_depth: usize,

    /// Treat warnings as failures in `tiledforge check`.
    pub deny_warnings: bool,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
            deny_warnings: false,
            excludes: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TmxError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load `tiledforge.yaml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| TmxError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILE)),
        })
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            max_group_depth: self.max_group_depth,
        }
    }

    /// Check if a path matches one of the exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy().replace('\\', "/");
        self.excludes.iter().any(|pattern| matches_pattern(&path, pattern))
    }
}

/// Minimal glob matching for exclude patterns.
///
/// Supported forms: `**/dir/*` (a directory anywhere), `dir/*` (a directory
/// at the start of the path), `*suffix` (file suffix), and plain substrings.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(rest) = pattern.strip_prefix("**/") {
        if let Some(dir) = rest.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
        }
        return path.ends_with(rest) || path.contains(&format!("/{}", rest));
    }

    if let Some(dir) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !suffix.contains('/') {
            return path.ends_with(suffix);
        }
    }

    path.contains(pattern)
}
