//! Store configuration.

use crate::error::{Result, YurtleError};
use crate::index::DEFAULT_INDEX_FILE;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the optional configuration file at the workspace root.
pub const CONFIG_FILE: &str = "yurtle.toml";

/// Default inclusion pattern.
pub const DEFAULT_PATTERN: &str = "**/*.md";

/// Configuration for a [`YurtleStore`](crate::YurtleStore).
///
/// # Examples
///
/// ```
/// use yurtle_core::StoreConfig;
///
/// let config: StoreConfig = toml::from_str("patterns = [\"tasks/*.md\"]\nauto_flush = true\n").unwrap();
/// assert!(config.auto_flush);
/// assert_eq!(config.index_file, ".yurtle-store-index.json");
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Glob patterns relative to the root. `*` does not match `/`.
    pub patterns: Vec<String>,

    /// Write each mutation through to disk immediately (default: false).
    pub auto_flush: bool,

    /// File name of the index snapshot inside the root.
    pub index_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            patterns: vec![DEFAULT_PATTERN.to_string()],
            auto_flush: false,
            index_file: DEFAULT_INDEX_FILE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Loads `yurtle.toml` from the root, or the defaults if it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| YurtleError::Config(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| YurtleError::Config(format!("failed to parse config: {}", e)))
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_auto_flush(mut self, auto_flush: bool) -> Self {
        self.auto_flush = auto_flush;
        self
    }

    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = index_file.into();
        self
    }

    /// Checks the configuration without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        self.glob_set()?;
        let name = self.index_file.as_str();
        if name.is_empty() || name == "." || name == ".." {
            return Err(YurtleError::Config(format!(
                "invalid index_file name: {:?}",
                name
            )));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(YurtleError::Config(format!(
                "index_file must be a plain file name, got {:?}",
                name
            )));
        }
        Ok(())
    }

    /// Compiles the inclusion patterns.
    pub fn glob_set(&self) -> Result<GlobSet> {
        if self.patterns.is_empty() {
            return Err(YurtleError::Config(
                "at least one pattern is required".to_string(),
            ));
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| YurtleError::Config(format!("invalid pattern {:?}: {}", pattern, e)))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| YurtleError::Config(format!("invalid patterns: {}", e)))
    }
}
