//! Configuration handling for steadyref.
//!
//! Configuration lives in `steadyref.toml` at the workspace root:
//!
//! ```toml
//! include = ["src/**/*.tsx"]
//! exclude = ["**/*.stories.tsx"]
//!
//! [rules]
//! no-unstable-computed-value = false
//! ```
//!
//! Every key is optional. Rules missing from `[rules]` stay enabled.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use steadyref_jsx::{RuleError, RuleSet};
use thiserror::Error;
use tracing::debug;

/// Name of the configuration file looked up in the workspace root.
pub const CONFIG_FILE: &str = "steadyref.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML or has unexpected keys.
    #[error("failed to parse config file {}: {}", .path.display(), .message)]
    Parse { path: PathBuf, message: String },

    /// `[rules]` names a rule that does not exist.
    #[error("unknown rule '{name}' in [rules]")]
    UnknownRule { name: String },
}

impl From<RuleError> for ConfigError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::UnknownRule { name } => ConfigError::UnknownRule { name },
        }
    }
}

/// steadyref configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Globs (relative to the workspace root) selecting files to analyze
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Globs excluded on top of the built-in exclusions
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Rule name -> enabled
    #[serde(default)]
    pub rules: BTreeMap<String, bool>,
}

fn default_include() -> Vec<String> {
    ["**/*.tsx", "**/*.jsx", "**/*.ts", "**/*.js"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: Vec::new(),
            rules: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse configuration text; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        // Unknown rule names fail the load.
        config.rule_set()?;
        Ok(config)
    }

    /// Load `steadyref.toml` from the workspace root, or the defaults if it
    /// does not exist
    pub fn load_from_workspace(workspace_root: &Path) -> Result<Self, ConfigError> {
        let config_path = workspace_root.join(CONFIG_FILE);
        if config_path.is_file() {
            debug!(path = %config_path.display(), "loading config");
            Self::load(&config_path)
        } else {
            debug!(root = %workspace_root.display(), "no config file; using defaults");
            Ok(Config::default())
        }
    }

    /// The rules this configuration enables
    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        Ok(RuleSet::from_config(&self.rules)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
