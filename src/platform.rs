//! Host environment used for cache path resolution.
//!
//! Scanners never read the process environment directly. The
//! [`Environment`] is captured once per scan (or built by hand in tests)
//! and handed to each scanner's path resolution, which keeps the
//! per-manager path tables pure functions of their inputs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Overrides `pnpm` reads to locate its home directory.
pub const PNPM_HOME: &str = "PNPM_HOME";
/// Alternate Yarn cache folder.
pub const YARN_CACHE_FOLDER: &str = "YARN_CACHE_FOLDER";
/// Alternate Deno cache directory.
pub const DENO_DIR: &str = "DENO_DIR";
/// Global npm install prefix.
pub const NPM_CONFIG_PREFIX: &str = "NPM_CONFIG_PREFIX";

/// Home directory plus the manager-specific override variables.
///
/// Empty variables are stored as `None`, the same as unset ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    home: Option<PathBuf>,
    pnpm_home: Option<PathBuf>,
    yarn_cache_folder: Option<PathBuf>,
    deno_dir: Option<PathBuf>,
    npm_prefix: Option<PathBuf>,
}

impl Environment {
    /// Reads the current user's home directory and override variables.
    pub fn from_process() -> Self {
        Self {
            home: dirs::home_dir().filter(|p| !p.as_os_str().is_empty()),
            pnpm_home: var_path(std::env::var_os(PNPM_HOME)),
            yarn_cache_folder: var_path(std::env::var_os(YARN_CACHE_FOLDER)),
            deno_dir: var_path(std::env::var_os(DENO_DIR)),
            npm_prefix: var_path(std::env::var_os(NPM_CONFIG_PREFIX)),
        }
    }

    /// An environment with only a home directory set.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
            ..Self::default()
        }
    }

    pub fn pnpm_home(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        self.pnpm_home = var_path(Some(path.into_os_string()));
        self
    }

    pub fn yarn_cache_folder(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        self.yarn_cache_folder = var_path(Some(path.into_os_string()));
        self
    }

    pub fn deno_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        self.deno_dir = var_path(Some(path.into_os_string()));
        self
    }

    pub fn npm_prefix(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        self.npm_prefix = var_path(Some(path.into_os_string()));
        self
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn pnpm_home_dir(&self) -> Option<&Path> {
        self.pnpm_home.as_deref()
    }

    pub fn yarn_cache_dir(&self) -> Option<&Path> {
        self.yarn_cache_folder.as_deref()
    }

    pub fn deno_cache_dir(&self) -> Option<&Path> {
        self.deno_dir.as_deref()
    }

    pub fn npm_prefix_dir(&self) -> Option<&Path> {
        self.npm_prefix.as_deref()
    }
}

fn var_path(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Returns the config directory for node-packages.
///
/// Platform-specific locations:
/// - Linux: `~/.config/node-packages/`
/// - macOS: `~/Library/Application Support/node-packages/`
/// - Windows: `%APPDATA%\node-packages\`
///
/// Falls back to the working directory if no config directory can be determined.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("node-packages")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_override_is_unset() {
        let env = Environment::with_home("/home/me").pnpm_home("").deno_dir("");

        assert_eq!(env.home(), Some(Path::new("/home/me")));
        assert_eq!(env.pnpm_home_dir(), None);
        assert_eq!(env.deno_cache_dir(), None);
    }

    #[test]
    fn test_default_has_no_home() {
        let env = Environment::default();
        assert!(env.home().is_none());
        assert!(env.yarn_cache_dir().is_none());
    }
}
