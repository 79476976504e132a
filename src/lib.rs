pub mod config;
pub mod error;
pub mod locator;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod platform;
pub mod scanner;

pub use config::Config;
pub use error::ScanError;
pub use locator::{locate, Located};
pub use model::{Diagnostic, DiagnosticKind, Inventory, Manager, PackageRecord};
pub use orchestrator::{scan_all, Orchestrator};
pub use scanner::Scanner;
