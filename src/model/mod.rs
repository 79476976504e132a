//! Core data types for package records, diagnostics, and scan results.
//!
//! This module contains the fundamental types used throughout node-packages:
//!
//! - [`PackageRecord`] - A package discovered from a `package.json` manifest
//! - [`Manager`] - The package manager whose cache held the manifest
//! - [`Diagnostic`] - Something that was skipped or failed during a scan
//! - [`Inventory`] - Complete scan results
//!
//! # Example
//!
//! ```
//! use node_packages::{Inventory, Manager, PackageRecord};
//!
//! let record = PackageRecord::new("lodash", "4.17.21", Manager::Npm, "/home/me/.npm/lodash/package.json");
//! let inventory = Inventory::new(vec![record], Vec::new());
//!
//! println!("Found {} packages", inventory.records.len());
//! ```

mod diagnostic;
mod inventory;
mod package;

pub use diagnostic::*;
pub use inventory::*;
pub use package::*;
