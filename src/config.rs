//! Configuration file handling.
//!
//! This module loads node-packages configuration from a TOML file. The tool
//! only ever reads this file; `node-packages config --default` prints a
//! starting point to redirect into it.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/node-packages/config.toml`
//! - macOS: `~/Library/Application Support/node-packages/config.toml`
//! - Windows: `%APPDATA%\node-packages\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! default_format = "table"
//! parallel = true
//! managers = ["npm", "pnpm", "yarn"]
//!
//! [extra_roots]
//! npm = ["/srv/ci/npm-cache"]
//!
//! [ignore]
//! packages = ["@types/*", "left-pad"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Manager;
use crate::platform::config_dir;
use crate::scanner::{get_scanner, Scanner};

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use node_packages::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Managers: {:?}", config.managers);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: String,

    /// Whether managers are scanned concurrently.
    ///
    /// Default: true
    pub parallel: bool,

    /// Which managers to scan when no `--manager` flag is provided.
    ///
    /// Default: all managers
    pub managers: Vec<Manager>,

    /// Extra cache roots per manager, keyed by manager name.
    ///
    /// These are scanned in addition to the built-in locations.
    pub extra_roots: BTreeMap<String, Vec<PathBuf>>,

    /// Packages to leave out of the output.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Configuration for hiding packages from results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Package names to exclude from output.
    ///
    /// Supports glob patterns (e.g., "lodash*", "@types/*").
    pub packages: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a package should be ignored.
    pub fn should_ignore_package(&self, name: &str) -> bool {
        self.packages.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, name)
            } else {
                pattern == name
            }
        })
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    // Check prefix (before first *)
    if !parts[0].is_empty() {
        if !remaining.starts_with(parts[0]) {
            return false;
        }
        remaining = &remaining[parts[0].len()..];
    }

    // Check suffix (after last *)
    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        if !remaining.ends_with(last_part) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last_part.len()];
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: "table".to_string(),
            parallel: true,
            managers: Manager::ALL.to_vec(),
            extra_roots: BTreeMap::new(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use node_packages::Config;
    ///
    /// let path = Config::config_path();
    /// println!("Config file: {}", path.display());
    /// ```
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Resolves `extra_roots` keys to managers.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first key that is not a known manager.
    pub fn extra_roots(&self) -> Result<BTreeMap<Manager, Vec<PathBuf>>> {
        let mut resolved: BTreeMap<Manager, Vec<PathBuf>> = BTreeMap::new();
        for (key, paths) in &self.extra_roots {
            let manager: Manager = key
                .parse()
                .map_err(|e: String| anyhow::anyhow!("Invalid extra_roots key: {}", e))?;
            resolved.entry(manager).or_default().extend(paths.iter().cloned());
        }
        Ok(resolved)
    }

    /// Scanners for the enabled managers, in config order.
    pub fn scanners(&self) -> Vec<Box<dyn Scanner>> {
        self.managers.iter().copied().map(get_scanner).collect()
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
