use serde::Serialize;
use std::path::PathBuf;

use super::Manager;

/// Why something was left out of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A `package.json` that is not valid JSON or has the wrong shape.
    MalformedManifest,
    /// A manifest with an empty or missing `name` or `version`.
    IncompleteManifest,
    /// A manifest that could not be read.
    ReadFailed,
    /// A directory entry the walk could not visit.
    TraversalFailed,
    /// A candidate cache root whose walk could not start.
    RootFailed,
    /// A whole manager scan that returned an error.
    ManagerFailed,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedManifest => "malformed manifest",
            DiagnosticKind::IncompleteManifest => "incomplete manifest",
            DiagnosticKind::ReadFailed => "read failed",
            DiagnosticKind::TraversalFailed => "traversal failed",
            DiagnosticKind::RootFailed => "root failed",
            DiagnosticKind::ManagerFailed => "manager failed",
        }
    }
}

/// Side-channel record of a skipped file, subtree, root or manager.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub manager: Manager,
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(manager: Manager, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            manager,
            kind,
            path: None,
            message: message.into(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}
