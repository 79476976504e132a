use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Manager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
    Deno,
}

impl Manager {
    pub const ALL: [Manager; 5] = [
        Manager::Npm,
        Manager::Pnpm,
        Manager::Yarn,
        Manager::Bun,
        Manager::Deno,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Manager::Npm => "npm",
            Manager::Pnpm => "pnpm",
            Manager::Yarn => "yarn",
            Manager::Bun => "bun",
            Manager::Deno => "deno",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Manager::Npm => "npm",
            Manager::Pnpm => "pnpm",
            Manager::Yarn => "Yarn",
            Manager::Bun => "Bun",
            Manager::Deno => "Deno",
        }
    }
}

impl std::fmt::Display for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Manager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(Manager::Npm),
            "pnpm" => Ok(Manager::Pnpm),
            "yarn" => Ok(Manager::Yarn),
            "bun" => Ok(Manager::Bun),
            "deno" => Ok(Manager::Deno),
            _ => Err(format!(
                "Unknown manager: {}. Use: npm, pnpm, yarn, bun, deno",
                s
            )),
        }
    }
}

/// A single package found in a package manager cache.
///
/// Records are built once by the manifest locator and never modified
/// afterwards, so the fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    name: String,
    version: String,
    manager: Manager,
    cache_path: PathBuf,
}

impl PackageRecord {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        manager: Manager,
        cache_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            manager,
            cache_path: cache_path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The manager whose scan rule located this manifest.
    pub fn manager(&self) -> Manager {
        self.manager
    }

    /// Path of the `package.json` this record was read from.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_round_trips_through_str() {
        for manager in Manager::ALL {
            assert_eq!(manager.as_str().parse::<Manager>(), Ok(manager));
        }
        assert_eq!("PNPM".parse::<Manager>(), Ok(Manager::Pnpm));
        assert!("cargo".parse::<Manager>().is_err());
    }

    #[test]
    fn test_record_serializes_with_column_names() {
        let record = PackageRecord::new("a", "1.0.0", Manager::Yarn, "/cache/a/package.json");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["name"], "a");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["manager"], "yarn");
        assert_eq!(value["cache_path"], "/cache/a/package.json");
    }
}
