//! Scanning every package manager and merging the results.
//!
//! The [`Orchestrator`] runs one task per manager. Each task builds its whole
//! batch of records without touching shared state, then takes the aggregate
//! lock once to merge it. A manager that fails is logged and recorded as a
//! [`DiagnosticKind::ManagerFailed`] diagnostic; it never fails the scan.
//!
//! # Example
//!
//! ```no_run
//! use node_packages::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let inventory = Orchestrator::default().run().await;
//!     for record in &inventory.records {
//!         println!("{}@{} ({})", record.name(), record.version(), record.manager());
//!     }
//! }
//! ```

use futures::future::join_all;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Result, ScanError};
use crate::model::{Diagnostic, DiagnosticKind, Inventory, Manager, PackageRecord};
use crate::platform::Environment;
use crate::scanner::{all_scanners, ManagerScan, Scanner};

type ProgressFn = Arc<dyn Fn(Manager) + Send + Sync>;

/// The one piece of state shared between manager tasks.
#[derive(Default)]
struct Aggregate {
    records: Vec<PackageRecord>,
    diagnostics: Vec<Diagnostic>,
}

impl Aggregate {
    fn absorb(&mut self, manager: Manager, outcome: Result<ManagerScan>) {
        match outcome {
            Ok(scan) => {
                debug!(
                    manager = %manager,
                    records = scan.records.len(),
                    skipped = scan.diagnostics.len(),
                    "manager scan finished"
                );
                self.records.extend(scan.records);
                self.diagnostics.extend(scan.diagnostics);
            }
            Err(e) => {
                warn!(manager = %manager, error = %e, "manager scan failed");
                self.diagnostics.push(Diagnostic::new(
                    manager,
                    DiagnosticKind::ManagerFailed,
                    e.to_string(),
                ));
            }
        }
    }
}

/// Runs a set of scanners and collects an [`Inventory`].
pub struct Orchestrator {
    scanners: Vec<Arc<dyn Scanner>>,
    env: Environment,
    extra_roots: BTreeMap<Manager, Vec<PathBuf>>,
    parallel: bool,
    progress: Option<ProgressFn>,
}

impl Orchestrator {
    /// Creates an orchestrator over `scanners` using the process environment.
    pub fn new(scanners: Vec<Box<dyn Scanner>>) -> Self {
        Self {
            scanners: scanners.into_iter().map(Arc::from).collect(),
            env: Environment::from_process(),
            extra_roots: BTreeMap::new(),
            parallel: true,
            progress: None,
        }
    }

    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Additional roots per manager, scanned after the built-in ones.
    pub fn with_extra_roots(mut self, extra_roots: BTreeMap<Manager, Vec<PathBuf>>) -> Self {
        self.extra_roots = extra_roots;
        self
    }

    /// Scan managers one after another instead of concurrently.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Called once per manager after its results have been merged.
    pub fn on_manager_done<F>(mut self, f: F) -> Self
    where
        F: Fn(Manager) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(f));
        self
    }

    pub fn scanner_count(&self) -> usize {
        self.scanners.len()
    }

    /// Candidate roots for every scanner, in scanner order.
    pub fn roots(&self) -> Vec<(Manager, Vec<PathBuf>)> {
        self.scanners
            .iter()
            .map(|s| (s.manager(), self.roots_for(s.as_ref())))
            .collect()
    }

    fn roots_for(&self, scanner: &dyn Scanner) -> Vec<PathBuf> {
        let mut roots = scanner.candidate_roots(&self.env);
        if let Some(extra) = self.extra_roots.get(&scanner.manager()) {
            roots.extend(extra.iter().cloned());
        }
        roots
    }

    /// Scans every manager and returns the merged inventory.
    ///
    /// Always succeeds. Failures are available in
    /// [`Inventory::diagnostics`].
    pub async fn run(&self) -> Inventory {
        let aggregate = Arc::new(Mutex::new(Aggregate::default()));

        if self.parallel && self.scanners.len() > 1 {
            self.run_concurrent(&aggregate).await;
        } else {
            self.run_sequential(&aggregate).await;
        }

        let Aggregate {
            records,
            diagnostics,
        } = std::mem::take(&mut *aggregate.lock().await);

        info!(
            managers = self.scanners.len(),
            records = records.len(),
            diagnostics = diagnostics.len(),
            "scan complete"
        );

        Inventory::new(records, diagnostics)
    }

    async fn run_concurrent(&self, aggregate: &Arc<Mutex<Aggregate>>) {
        let (managers, handles): (Vec<_>, Vec<_>) = self
            .scanners
            .iter()
            .map(|scanner| {
                let manager = scanner.manager();
                let scanner = Arc::clone(scanner);
                let roots = self.roots_for(scanner.as_ref());
                let aggregate = Arc::clone(aggregate);
                let progress = self.progress.clone();

                let handle = tokio::spawn(async move {
                    let outcome = scanner.scan(roots).await;
                    aggregate.lock().await.absorb(manager, outcome);
                    if let Some(progress) = progress {
                        progress(manager);
                    }
                });
                (manager, handle)
            })
            .unzip();

        for (manager, joined) in managers.into_iter().zip(join_all(handles).await) {
            if let Err(source) = joined {
                aggregate
                    .lock()
                    .await
                    .absorb(manager, Err(ScanError::Task { manager, source }));
            }
        }
    }

    /// One manager at a time. Each scan still runs in its own task so a
    /// panicking scanner is contained the same way as in concurrent mode.
    async fn run_sequential(&self, aggregate: &Arc<Mutex<Aggregate>>) {
        for scanner in &self.scanners {
            let manager = scanner.manager();
            let roots = self.roots_for(scanner.as_ref());
            let scanner = Arc::clone(scanner);

            let outcome = match tokio::spawn(async move { scanner.scan(roots).await }).await {
                Ok(outcome) => outcome,
                Err(source) => Err(ScanError::Task { manager, source }),
            };
            aggregate.lock().await.absorb(manager, outcome);
            if let Some(progress) = &self.progress {
                progress(manager);
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(all_scanners())
    }
}

/// Scans every supported manager using the current process environment.
///
/// Blocks the calling thread. Must not be called from inside a tokio runtime;
/// use [`Orchestrator::run`] there instead.
///
/// # Errors
///
/// Returns [`ScanError::Runtime`] if the scan runtime cannot be created.
/// Nothing that happens during the scan itself is reported as an error.
pub fn scan_all() -> Result<Inventory> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(Orchestrator::default().run()))
}
