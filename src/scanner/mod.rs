//! Package manager cache scanners.
//!
//! This module provides the [`Scanner`] trait and one implementation per
//! supported package manager. Each scanner knows where its manager keeps
//! packages; the actual manifest discovery is shared and lives in
//! [`locator`](crate::locator).
//!
//! # Available Scanners
//!
//! | Scanner | Manager | Override variable |
//! |---------|---------|-------------------|
//! | [`NpmScanner`] | npm | `NPM_CONFIG_PREFIX` (adds) |
//! | [`PnpmScanner`] | pnpm | `PNPM_HOME` (adds) |
//! | [`YarnScanner`] | yarn | `YARN_CACHE_FOLDER` (adds) |
//! | [`BunScanner`] | bun | none |
//! | [`DenoScanner`] | deno | `DENO_DIR` (replaces) |
//!
//! # Example
//!
//! ```no_run
//! use node_packages::platform::Environment;
//! use node_packages::scanner::{all_scanners, Scanner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let env = Environment::from_process();
//!     for scanner in all_scanners() {
//!         let roots = scanner.candidate_roots(&env);
//!         let scan = scanner.scan(roots).await?;
//!         println!("{}: {} packages", scanner.name(), scan.records.len());
//!     }
//!     Ok(())
//! }
//! ```

mod bun;
mod deno;
mod npm;
mod pnpm;
mod yarn;

pub use bun::BunScanner;
pub use deno::DenoScanner;
pub use npm::NpmScanner;
pub use pnpm::PnpmScanner;
pub use yarn::YarnScanner;

use crate::error::{Result, ScanError};
use crate::locator::locate;
use crate::model::{Diagnostic, DiagnosticKind, Manager, PackageRecord};
use crate::platform::Environment;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Everything one manager contributed to a scan.
#[derive(Debug)]
pub struct ManagerScan {
    pub manager: Manager,
    pub records: Vec<PackageRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Trait describing one package manager: its label and how to scan it.
///
/// Path resolution is kept separate from scanning so that
/// [`candidate_roots`](Self::candidate_roots) stays a pure function of the
/// [`Environment`] and can be tested without touching the filesystem.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Returns the human-readable name of this scanner.
    fn name(&self) -> &'static str;

    /// Returns the manager label attached to every record this scanner finds.
    fn manager(&self) -> Manager;

    /// Cache roots this manager may use on this host.
    ///
    /// Returns an empty list when the home directory is unknown.
    fn candidate_roots(&self, env: &Environment) -> Vec<PathBuf>;

    /// Walks every root and merges the results.
    ///
    /// A root that fails to walk is recorded as a diagnostic and skipped.
    /// The filesystem work runs on tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Task`] if the blocking task panics or is cancelled.
    async fn scan(&self, roots: Vec<PathBuf>) -> Result<ManagerScan> {
        let manager = self.manager();
        tokio::task::spawn_blocking(move || scan_roots(manager, &roots))
            .await
            .map_err(|source| ScanError::Task { manager, source })
    }
}

/// Locates manifests under each root in turn, tagging them with `manager`.
///
/// A manifest reachable from more than one root (an override pointing at a
/// default location, or one root nested in another) is reported once.
pub fn scan_roots(manager: Manager, roots: &[PathBuf]) -> ManagerScan {
    let mut scan = ManagerScan {
        manager,
        records: Vec::new(),
        diagnostics: Vec::new(),
    };
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for root in roots {
        match locate(root, manager) {
            Ok(located) => {
                let found = located.records.len();
                let kept = scan.records.len();
                scan.records.extend(
                    located
                        .records
                        .into_iter()
                        .filter(|r| seen.insert(r.cache_path().to_path_buf())),
                );
                let repeated = found - (scan.records.len() - kept);
                if repeated > 0 {
                    debug!(manager = %manager, root = %root.display(), repeated, "root overlaps an earlier root");
                }
                scan.diagnostics.extend(located.diagnostics);
            }
            Err(e) => {
                warn!(manager = %manager, root = %root.display(), error = %e, "skipping cache root");
                scan.diagnostics.push(
                    Diagnostic::new(manager, DiagnosticKind::RootFailed, e.to_string())
                        .with_path(root),
                );
            }
        }
    }

    scan
}

/// Returns a list of all available scanners.
///
/// # Example
///
/// ```
/// use node_packages::scanner::all_scanners;
///
/// let scanners = all_scanners();
/// assert_eq!(scanners.len(), 5);
/// ```
pub fn all_scanners() -> Vec<Box<dyn Scanner>> {
    Manager::ALL.into_iter().map(get_scanner).collect()
}

/// Returns the scanner for a specific manager.
///
/// # Example
///
/// ```
/// use node_packages::{Manager, scanner::get_scanner};
///
/// let scanner = get_scanner(Manager::Pnpm);
/// assert_eq!(scanner.manager(), Manager::Pnpm);
/// ```
pub fn get_scanner(manager: Manager) -> Box<dyn Scanner> {
    match manager {
        Manager::Npm => Box::new(NpmScanner),
        Manager::Pnpm => Box::new(PnpmScanner),
        Manager::Yarn => Box::new(YarnScanner),
        Manager::Bun => Box::new(BunScanner),
        Manager::Deno => Box::new(DenoScanner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_manifest(path: &Path, name: &str, version: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            path,
            format!(r#"{{"name":"{}","version":"{}"}}"#, name, version),
        )
        .unwrap();
    }

    #[test]
    fn test_scanner_labels_match_managers() {
        for (scanner, manager) in all_scanners().iter().zip(Manager::ALL) {
            assert_eq!(scanner.manager(), manager);
            assert!(!scanner.name().is_empty());
        }
    }

    #[test]
    fn test_no_home_means_no_roots() {
        let env = Environment::default().pnpm_home("/p").deno_dir("/d");
        for scanner in all_scanners() {
            assert!(
                scanner.candidate_roots(&env).is_empty(),
                "{} returned roots without a home directory",
                scanner.name()
            );
        }
    }

    #[test]
    fn test_scan_roots_unions_all_roots() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        write_manifest(&a.path().join("x/package.json"), "x", "1.0.0");
        write_manifest(&b.path().join("y/package.json"), "y", "2.0.0");
        write_manifest(&b.path().join("x/package.json"), "x", "1.0.0");

        let roots = vec![
            a.path().to_path_buf(),
            PathBuf::from("/definitely/does/not/exist"),
            b.path().to_path_buf(),
        ];
        let scan = scan_roots(Manager::Yarn, &roots);

        assert_eq!(scan.manager, Manager::Yarn);
        assert_eq!(scan.records.len(), 3);
        assert!(scan.diagnostics.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_root_does_not_hide_other_roots() {
        use std::os::unix::fs::PermissionsExt;

        let a = TempDir::new().unwrap();
        let locked = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        write_manifest(&a.path().join("x/package.json"), "x", "1.0.0");
        write_manifest(&locked.path().join("z/package.json"), "z", "1.0.0");
        write_manifest(&b.path().join("y/package.json"), "y", "2.0.0");
        fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o000)).unwrap();
        // Permission bits do not stop a privileged user.
        if fs::read_dir(locked.path()).is_ok() {
            fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let roots = vec![
            a.path().to_path_buf(),
            locked.path().to_path_buf(),
            b.path().to_path_buf(),
        ];
        let scan = scan_roots(Manager::Bun, &roots);
        fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o755)).unwrap();

        let names: Vec<_> = scan.records.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(scan.diagnostics.len(), 1);
        assert_eq!(scan.diagnostics[0].kind, DiagnosticKind::RootFailed);
        assert_eq!(scan.diagnostics[0].path.as_deref(), Some(locked.path()));
    }

    #[test]
    fn test_nested_roots_report_each_manifest_once() {
        let dir = TempDir::new().unwrap();
        write_manifest(&dir.path().join("sub/x/package.json"), "x", "1.0.0");
        write_manifest(&dir.path().join("y/package.json"), "y", "1.0.0");

        let roots = vec![
            dir.path().join("sub"),
            dir.path().to_path_buf(),
            dir.path().join("sub"),
        ];
        let scan = scan_roots(Manager::Npm, &roots);

        let mut paths: Vec<_> = scan.records.iter().map(|r| r.cache_path().to_path_buf()).collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                dir.path().join("sub/x/package.json"),
                dir.path().join("y/package.json"),
            ]
        );
    }

    #[tokio::test]
    async fn test_pnpm_home_at_default_location_is_not_counted_twice() {
        let home = TempDir::new().unwrap();
        let rel = ".local/share/pnpm/store/v3/left-pad/package.json";
        write_manifest(&home.path().join(rel), "left-pad", "1.3.0");

        let env = Environment::with_home(home.path())
            .pnpm_home(home.path().join(".local/share/pnpm"));
        let scanner = get_scanner(Manager::Pnpm);
        let scan = scanner.scan(scanner.candidate_roots(&env)).await.unwrap();

        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.records[0].cache_path(), home.path().join(rel));
    }

    #[tokio::test]
    async fn test_yarn_cache_folder_at_default_location_is_not_counted_twice() {
        let home = TempDir::new().unwrap();
        let rel = ".cache/yarn/v6/npm-left-pad/package.json";
        write_manifest(&home.path().join(rel), "left-pad", "1.3.0");

        let env = Environment::with_home(home.path())
            .yarn_cache_folder(home.path().join(".cache/yarn"));
        let scanner = get_scanner(Manager::Yarn);
        let scan = scanner.scan(scanner.candidate_roots(&env)).await.unwrap();

        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.records[0].cache_path(), home.path().join(rel));
    }

    #[tokio::test]
    async fn test_each_scanner_finds_packages_under_home() {
        let home = TempDir::new().unwrap();
        let layouts = [
            (Manager::Npm, ".npm/_npx/abc/node_modules/left-pad/package.json"),
            (Manager::Pnpm, ".local/share/pnpm/store/v3/left-pad/package.json"),
            (Manager::Yarn, ".cache/yarn/v6/npm-left-pad/package.json"),
            (Manager::Bun, ".bun/install/cache/left-pad@1.3.0/package.json"),
            (Manager::Deno, ".cache/deno/npm/registry.npmjs.org/left-pad/1.3.0/package.json"),
        ];
        for (_, rel) in layouts {
            write_manifest(&home.path().join(rel), "left-pad", "1.3.0");
        }

        let env = Environment::with_home(home.path());
        for (manager, rel) in layouts {
            let scanner = get_scanner(manager);
            let scan = scanner.scan(scanner.candidate_roots(&env)).await.unwrap();

            let ours: Vec<_> = scan
                .records
                .iter()
                .filter(|r| r.cache_path().starts_with(home.path()))
                .collect();
            assert_eq!(ours.len(), 1, "{} found {:?}", manager, ours);
            assert_eq!(ours[0].cache_path(), home.path().join(rel));
            assert!(scan.records.iter().all(|r| r.manager() == manager));
        }
    }
}
