mod cli;
mod json;
pub mod rows;

pub use cli::print_cli_table;
pub use json::print_json;
pub use rows::{to_row, to_rows, Row, COLUMNS};

use crate::model::Inventory;
use anyhow::Result;

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON array of `name`/`version`/`manager`/`cache_path` rows
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'table' or 'json'", s)),
        }
    }
}

pub fn print_result(inventory: &Inventory, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_cli_table(inventory),
        OutputFormat::Json => print_json(inventory),
    }
}
