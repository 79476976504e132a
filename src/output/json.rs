use crate::model::Inventory;
use anyhow::Result;

use super::rows::to_rows;

pub fn generate_json_string(inventory: &Inventory) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_rows(&inventory.records))?)
}

pub fn print_json(inventory: &Inventory) -> Result<()> {
    println!("{}", generate_json_string(inventory)?);
    Ok(())
}
