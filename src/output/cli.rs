use crate::model::{DiagnosticKind, Inventory};
use anyhow::Result;
use std::collections::BTreeMap;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Manager")]
    manager: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Cache Path")]
    cache_path: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Manager")]
    manager: String,
    #[tabled(rename = "Packages")]
    packages: usize,
}

pub fn print_cli_table(inventory: &Inventory) -> Result<()> {
    println!();
    println!(
        "Scan completed at: {}",
        inventory.scan_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    if inventory.records.is_empty() {
        println!("No packages found.");
    } else {
        println!("Found {} packages:", inventory.records.len());
        println!();

        let mut records: Vec<_> = inventory.records.iter().collect();
        records.sort_by(|a, b| {
            (a.manager(), a.name(), a.version()).cmp(&(b.manager(), b.name(), b.version()))
        });

        let rows: Vec<PackageRow> = records
            .iter()
            .map(|r| PackageRow {
                manager: r.manager().display_name().to_string(),
                name: truncate(r.name(), 40),
                version: truncate(r.version(), 20),
                cache_path: r.cache_path().display().to_string(),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    println!();
    print_summary(inventory);

    Ok(())
}

fn print_summary(inventory: &Inventory) {
    let counts = inventory.counts_by_manager();
    if !counts.is_empty() {
        let rows: Vec<SummaryRow> = counts
            .iter()
            .map(|(manager, packages)| SummaryRow {
                manager: manager.display_name().to_string(),
                packages: *packages,
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    for manager in inventory.failed_managers() {
        println!("Warning: {} could not be scanned", manager.display_name());
    }

    let mut skipped: BTreeMap<&'static str, usize> = BTreeMap::new();
    for diagnostic in &inventory.diagnostics {
        if diagnostic.kind != DiagnosticKind::ManagerFailed {
            *skipped.entry(diagnostic.kind.as_str()).or_default() += 1;
        }
    }
    if !skipped.is_empty() {
        let parts: Vec<String> = skipped
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();
        println!("Skipped: {}", parts.join(", "));
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("left-pad", 40), "left-pad");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ééééééééé", 6), "ééé...");
    }
}
