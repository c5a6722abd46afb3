//! Reference directory resolution, discovery and document loading.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use labref_types::well_known::{DOCUMENT_EXTENSION, REFERENCES_DIR_ENV};
use labref_types::ReferenceDocument;
use tracing::debug;

use crate::global;
use crate::parser;
use crate::types::{LabRefError, LabRefResult};

/// Directory of the reference documents shipped with this crate.
pub fn bundled_references_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/references"))
}

/// Resolves the active references directory.
///
/// Precedence: `explicit` (when non-empty), the process-wide override set
/// with [`set_references_dir`](crate::set_references_dir), the
/// `LAB_REF_DIR` environment variable (when non-empty), the bundled
/// directory. Recomputed on every call.
pub fn resolve_directory(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return dir.to_path_buf();
    }

    if let Some(dir) = global::directory_override() {
        return dir;
    }

    match std::env::var_os(REFERENCES_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => bundled_references_dir(),
    }
}

/// Path of the document for `test_type` inside `directory`.
pub fn document_path(directory: &Path, test_type: &str) -> PathBuf {
    directory.join(format!("{test_type}.{DOCUMENT_EXTENSION}"))
}

/// Lists the test types available in a directory.
///
/// Every `*.json` file stem, sorted lexicographically.
pub fn discover_test_types<P: AsRef<Path>>(directory: P) -> LabRefResult<Vec<String>> {
    let directory = directory.as_ref();

    if !directory.is_dir() {
        return Err(LabRefError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }

    let mut test_types = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            test_types.push(stem.to_string());
        }
    }

    test_types.sort();
    Ok(test_types)
}

/// Reads, parses and validates the document for `test_type`.
///
/// # Errors
/// - [`LabRefError::NotFound`] if `{directory}/{test_type}.json` does not exist
/// - [`LabRefError::Parse`] if the file is not valid JSON
/// - [`LabRefError::Validation`] if the JSON has the wrong structure
pub fn load_document(directory: &Path, test_type: &str) -> LabRefResult<ReferenceDocument> {
    let path = document_path(directory, test_type);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(LabRefError::NotFound {
                test_type: test_type.to_string(),
                path,
            })
        }
        Err(e) => return Err(e.into()),
    };

    let document = parse_document(&path, &content)?;
    debug!(
        test_type,
        path = %path.display(),
        tests = document.len(),
        "Loaded reference document"
    );
    Ok(document)
}

/// Parses and validates document text read from `path`.
pub fn parse_document(path: &Path, content: &str) -> LabRefResult<ReferenceDocument> {
    // Tolerate a UTF-8 BOM written by some editors.
    let content = content.trim_start_matches('\u{feff}');

    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|source| LabRefError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    parser::from_value(&value).map_err(|source| LabRefError::Validation {
        path: path.to_path_buf(),
        source,
    })
}
