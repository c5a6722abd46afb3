//! Process-wide default directory and the free-function API.
//!
//! The free functions use one shared [`ReferenceStore`] that follows the
//! directory resolution order: explicit argument, the override set here,
//! `LAB_REF_DIR`, the bundled references. Code that needs a different
//! directory per call site should build its own store instead.

use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use labref_types::{RangeEntry, Sex, Status, TestDefinition};
use tracing::{info, warn};

use crate::loader::{discover_test_types, resolve_directory};
use crate::report;
use crate::store::ReferenceStore;
use crate::types::LabRefResult;

static DIRECTORY_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

fn shared_store() -> &'static ReferenceStore {
    static STORE: OnceLock<ReferenceStore> = OnceLock::new();
    STORE.get_or_init(ReferenceStore::new)
}

/// Returns the directory set with [`set_references_dir`], if any.
pub fn directory_override() -> Option<PathBuf> {
    DIRECTORY_OVERRIDE
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

/// Makes `path` the default directory for the rest of the process.
///
/// The override takes precedence over `LAB_REF_DIR`; only an explicit
/// directory argument beats it. Cached documents of the shared store are
/// dropped.
pub fn set_references_dir<P: Into<PathBuf>>(path: P) {
    let path = path.into();
    info!(path = %path.display(), "Setting references directory");
    *DIRECTORY_OVERRIDE.write().unwrap_or_else(|e| e.into_inner()) = Some(path);
    shared_store().clear_cache();
}

/// Removes the override set with [`set_references_dir`].
pub fn reset_references_dir() {
    info!("Resetting references directory");
    *DIRECTORY_OVERRIDE.write().unwrap_or_else(|e| e.into_inner()) = None;
    shared_store().clear_cache();
}

/// The directory a call without an explicit directory would read from.
pub fn get_current_references_dir() -> PathBuf {
    resolve_directory(None)
}

/// Range of `test_name` for a patient. See [`ReferenceStore::get_reference`].
pub fn get_reference(
    test_type: &str,
    test_name: &str,
    sex: Option<Sex>,
    age: f64,
    references_dir: Option<&Path>,
) -> LabRefResult<RangeEntry> {
    let directory = resolve_directory(references_dir);
    shared_store().get_reference_in(&directory, test_type, test_name, sex, age)
}

/// Complete definition of `test_name`. See [`ReferenceStore::get_definition`].
pub fn get_definition(
    test_type: &str,
    test_name: &str,
    references_dir: Option<&Path>,
) -> LabRefResult<TestDefinition> {
    let directory = resolve_directory(references_dir);
    shared_store().get_definition_in(&directory, test_type, test_name)
}

/// Classifies one value. See [`ReferenceStore::check_value`].
pub fn check_value(
    test_type: &str,
    test_name: &str,
    value: f64,
    sex: Option<Sex>,
    age: f64,
    references_dir: Option<&Path>,
) -> LabRefResult<Status> {
    let directory = resolve_directory(references_dir);
    shared_store().check_value_in(&directory, test_type, test_name, value, sex, age)
}

/// Classifies several values. See [`ReferenceStore::check_values`].
pub fn check_values<I, K>(
    test_type: &str,
    values: I,
    sex: Option<Sex>,
    age: f64,
    references_dir: Option<&Path>,
) -> LabRefResult<Vec<(String, Status)>>
where
    I: IntoIterator<Item = (K, f64)>,
    K: AsRef<str>,
{
    let directory = resolve_directory(references_dir);
    shared_store().check_values_in(&directory, test_type, values, sex, age)
}

/// Test types of the resolved directory, sorted.
pub fn list_test_types(references_dir: Option<&Path>) -> LabRefResult<Vec<String>> {
    discover_test_types(resolve_directory(references_dir))
}

/// Test names of `test_type`, in document order.
pub fn get_test_keys(test_type: &str, references_dir: Option<&Path>) -> LabRefResult<Vec<String>> {
    let directory = resolve_directory(references_dir);
    shared_store().test_keys_in(&directory, test_type)
}

/// Table of every range of `test_type`.
pub fn reference_report(test_type: &str, references_dir: Option<&Path>) -> LabRefResult<String> {
    let directory = resolve_directory(references_dir);
    let document = shared_store().document_in(&directory, test_type)?;
    Ok(report::render_reference_report(&document, test_type))
}

/// Table of Russian names, keys and units of `test_type`.
pub fn test_names_report(test_type: &str, references_dir: Option<&Path>) -> LabRefResult<String> {
    let directory = resolve_directory(references_dir);
    let document = shared_store().document_in(&directory, test_type)?;
    Ok(report::render_test_names_report(&document))
}

/// Table of every test type of the resolved directory with its metadata.
///
/// Documents that fail to load are listed without metadata.
pub fn test_types_report(references_dir: Option<&Path>) -> LabRefResult<String> {
    let directory = resolve_directory(references_dir);
    let loaded = shared_store().load_all_in(&directory)?;

    let entries = loaded.iter().map(|(test_type, document)| match document {
        Ok(document) => (test_type.as_str(), Some(document.as_ref())),
        Err(e) => {
            warn!(test_type = %test_type, error = %e, "Skipping metadata of unreadable document");
            (test_type.as_str(), None)
        }
    });

    Ok(report::render_test_types_report(entries))
}
