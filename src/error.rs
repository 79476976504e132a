use std::path::PathBuf;
use thiserror::Error;

use crate::model::Manager;

/// Errors surfaced by the scanning library.
///
/// None of these escape [`Orchestrator::run`](crate::Orchestrator::run): walk
/// and manager failures are turned into diagnostics at the manager boundary.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{manager} scan task failed: {source}")]
    Task {
        manager: Manager,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("{manager} scan failed: {message}")]
    Manager { manager: Manager, message: String },

    #[error("failed to start scan runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type Result<T, E = ScanError> = std::result::Result<T, E>;
