//! Mapping records to the flat string rows a query engine consumes.

use std::collections::BTreeMap;

use crate::model::PackageRecord;

/// Column names, in table order. Every value is a string.
pub const COLUMNS: [&str; 4] = ["name", "version", "manager", "cache_path"];

pub type Row = BTreeMap<&'static str, String>;

pub fn to_row(record: &PackageRecord) -> Row {
    let mut row = Row::new();
    row.insert(COLUMNS[0], record.name().to_string());
    row.insert(COLUMNS[1], record.version().to_string());
    row.insert(COLUMNS[2], record.manager().as_str().to_string());
    row.insert(COLUMNS[3], record.cache_path().to_string_lossy().into_owned());
    row
}

/// An empty slice gives an empty table, not an error.
pub fn to_rows(records: &[PackageRecord]) -> Vec<Row> {
    records.iter().map(to_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Manager;

    #[test]
    fn test_row_has_every_column() {
        let record = PackageRecord::new("a", "1.0.0", Manager::Pnpm, "/store/a/package.json");
        let row = to_row(&record);

        assert_eq!(row.len(), COLUMNS.len());
        assert_eq!(row["name"], "a");
        assert_eq!(row["version"], "1.0.0");
        assert_eq!(row["manager"], "pnpm");
        assert_eq!(row["cache_path"], "/store/a/package.json");
    }

    #[test]
    fn test_empty_records() {
        assert!(to_rows(&[]).is_empty());
    }
}
