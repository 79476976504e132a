//! Recursive discovery of `package.json` manifests under a cache root.
//!
//! [`locate`] walks a single directory tree and turns every valid manifest it
//! finds into a [`PackageRecord`]. Anything it cannot use is reported as a
//! [`Diagnostic`] next to the records instead of stopping the walk:
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | Root does not exist | empty result |
//! | Root cannot be walked at all | [`ScanError::Walk`] |
//! | Subtree cannot be read | `TraversalFailed` diagnostic |
//! | Manifest cannot be read | `ReadFailed` diagnostic |
//! | Manifest is not a JSON object with string fields | `MalformedManifest` diagnostic |
//! | `name` or `version` empty or missing | `IncompleteManifest` diagnostic |

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Result, ScanError};
use crate::model::{Diagnostic, DiagnosticKind, Manager, PackageRecord};

/// File name every manager uses for package manifests.
pub const MANIFEST_FILE_NAME: &str = "package.json";

#[derive(Deserialize)]
struct Manifest {
    name: Option<String>,
    version: Option<String>,
}

/// Records and diagnostics produced by walking one root.
#[derive(Debug, Default)]
pub struct Located {
    pub records: Vec<PackageRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Walks `root` and returns a record for every valid manifest beneath it.
///
/// Records come back in walk order: pre-order, with siblings sorted by
/// file name. Symlinks are not followed.
///
/// # Errors
///
/// Returns [`ScanError::Walk`] only when `root` exists but the walk cannot
/// start (for example the root directory itself is unreadable).
pub fn locate(root: &Path, manager: Manager) -> Result<Located> {
    let mut located = Located::default();

    if matches!(root.try_exists(), Ok(false)) {
        trace!(manager = %manager, root = %root.display(), "cache root does not exist");
        return Ok(located);
    }

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) if err.depth() == 0 => {
                return Err(ScanError::Walk {
                    path: root.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                debug!(manager = %manager, error = %err, "skipping unreadable entry");
                let mut diagnostic =
                    Diagnostic::new(manager, DiagnosticKind::TraversalFailed, err.to_string());
                if let Some(path) = err.path() {
                    diagnostic = diagnostic.with_path(path);
                }
                located.diagnostics.push(diagnostic);
                continue;
            }
        };

        if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE_NAME {
            continue;
        }

        match read_manifest(entry.path(), manager) {
            Ok(record) => located.records.push(record),
            Err(diagnostic) => {
                trace!(
                    manager = %manager,
                    path = %entry.path().display(),
                    reason = diagnostic.kind.as_str(),
                    "skipping manifest"
                );
                located.diagnostics.push(diagnostic);
            }
        }
    }

    debug!(
        manager = %manager,
        root = %root.display(),
        records = located.records.len(),
        skipped = located.diagnostics.len(),
        "walked cache root"
    );

    Ok(located)
}

fn read_manifest(path: &Path, manager: Manager) -> Result<PackageRecord, Diagnostic> {
    let content = fs::read(path).map_err(|e| {
        Diagnostic::new(manager, DiagnosticKind::ReadFailed, e.to_string()).with_path(path)
    })?;

    let malformed = |msg: String| {
        Diagnostic::new(manager, DiagnosticKind::MalformedManifest, msg).with_path(path)
    };

    // A derived struct decoder also accepts `["name", "version"]`, so
    // require a JSON object before decoding the fields.
    let object = match serde_json::from_slice::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(malformed(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )));
        }
        Err(e) => return Err(malformed(e.to_string())),
    };
    let manifest =
        Manifest::deserialize(Value::Object(object)).map_err(|e| malformed(e.to_string()))?;

    match (manifest.name, manifest.version) {
        (Some(name), Some(version)) if !name.is_empty() && !version.is_empty() => {
            Ok(PackageRecord::new(name, version, manager, path))
        }
        _ => Err(Diagnostic::new(
            manager,
            DiagnosticKind::IncompleteManifest,
            "name or version is empty or missing",
        )
        .with_path(path)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
