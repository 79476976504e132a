use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{Diagnostic, DiagnosticKind, Manager, PackageRecord};

/// The result of one full scan across all managers.
///
/// Cross-manager ordering of `records` depends on task scheduling and
/// must not be relied upon.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    pub scan_time: DateTime<Utc>,
    pub records: Vec<PackageRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Inventory {
    pub fn new(records: Vec<PackageRecord>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            scan_time: Utc::now(),
            records,
            diagnostics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records contributed by each manager that found anything.
    pub fn counts_by_manager(&self) -> BTreeMap<Manager, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.manager()).or_insert(0) += 1;
        }
        counts
    }

    /// Managers whose whole scan failed.
    pub fn failed_managers(&self) -> Vec<Manager> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::ManagerFailed)
            .map(|d| d.manager)
            .collect()
    }

    /// Keeps only the records for which `predicate` returns true.
    pub fn retain_records<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&PackageRecord) -> bool,
    {
        self.records.retain(|r| predicate(r));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_manager() {
        let inventory = Inventory::new(
            vec![
                PackageRecord::new("a", "1.0.0", Manager::Npm, "/n/a/package.json"),
                PackageRecord::new("b", "1.0.0", Manager::Npm, "/n/b/package.json"),
                PackageRecord::new("a", "1.0.0", Manager::Bun, "/b/a/package.json"),
            ],
            Vec::new(),
        );

        let counts = inventory.counts_by_manager();
        assert_eq!(counts.get(&Manager::Npm), Some(&2));
        assert_eq!(counts.get(&Manager::Bun), Some(&1));
        assert_eq!(counts.get(&Manager::Deno), None);
    }

    #[test]
    fn test_failed_managers() {
        let inventory = Inventory::new(
            Vec::new(),
            vec![
                Diagnostic::new(Manager::Yarn, DiagnosticKind::ManagerFailed, "boom"),
                Diagnostic::new(Manager::Npm, DiagnosticKind::MalformedManifest, "bad json"),
            ],
        );

        assert!(inventory.is_empty());
        assert_eq!(inventory.failed_managers(), vec![Manager::Yarn]);
    }
}
