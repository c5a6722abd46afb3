//! Reference store: cached access to the documents of a directory.
//!
//! A [`ReferenceStore`] is the context object every lookup goes through.
//! Construct it once and pass it around:
//!
//! ```
//! use labref_loader::ReferenceStore;
//! use labref_types::{Sex, Status};
//!
//! let store = ReferenceStore::with_directory(labref_loader::bundled_references_dir());
//!
//! let status = store
//!     .check_value("blood_test", "hemoglobin", 125.0, Some(Sex::Male), 25.0)
//!     .unwrap();
//! assert_eq!(status, Status::Below);
//! ```
//!
//! Parsed documents are cached per (resolved directory, test type), so a
//! store that follows the process-wide directory never serves a document
//! from a directory that is no longer active.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use labref_types::{RangeEntry, ReferenceDocument, Sex, Status, TestDefinition};
use tracing::debug;

use crate::classify::{classify_value, classify_values};
use crate::loader::{discover_test_types, load_document, resolve_directory};
use crate::parser;
use crate::resolve::{find_definition, resolve_range};
use crate::results::LabResults;
use crate::types::{LabRefError, LabRefResult, StoreConfig};

type CacheKey = (PathBuf, String);

/// Cached access to reference documents.
///
/// # Example
///
/// ```no_run
/// use labref_loader::ReferenceStore;
/// use labref_types::Sex;
///
/// let store = ReferenceStore::with_directory("/srv/lab/references");
///
/// let mut results = store.lab_results("blood_test", Some(Sex::Female), 34.0)?;
/// results.add_results([("hemoglobin", 118.0), ("leukocytes", 6.1)])?;
///
/// for result in results.abnormal() {
///     println!("{}: {} {}", result.test_name, result.value, result.status);
/// }
/// # Ok::<(), labref_loader::LabRefError>(())
/// ```
pub struct ReferenceStore {
    /// Pinned directory; `None` follows [`resolve_directory`].
    directory: Option<PathBuf>,
    config: StoreConfig,
    cache: Mutex<HashMap<CacheKey, Arc<ReferenceDocument>>>,
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceStore")
            .field("directory", &self.directory)
            .field("config", &self.config)
            .field("cached", &self.cached_count())
            .finish()
    }
}

impl ReferenceStore {
    /// Creates a store that follows the process-wide directory resolution.
    pub fn new() -> Self {
        Self::with_config(None, StoreConfig::default())
    }

    /// Creates a store pinned to `directory`.
    pub fn with_directory<P: Into<PathBuf>>(directory: P) -> Self {
        Self::with_config(Some(directory.into()), StoreConfig::default())
    }

    /// Creates a store with an optional pinned directory and explicit config.
    pub fn with_config(directory: Option<PathBuf>, config: StoreConfig) -> Self {
        Self {
            directory,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The directory lookups currently read from.
    pub fn directory(&self) -> PathBuf {
        resolve_directory(self.directory.as_deref())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DOCUMENTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns the validated document for `test_type`.
    ///
    /// This is the no-filter lookup: the whole document, unmodified.
    pub fn document(&self, test_type: &str) -> LabRefResult<Arc<ReferenceDocument>> {
        self.document_in(&self.directory(), test_type)
    }

    /// Returns the validated document for `test_type` in `directory`.
    pub fn document_in(
        &self,
        directory: &Path,
        test_type: &str,
    ) -> LabRefResult<Arc<ReferenceDocument>> {
        if !self.config.cache_documents {
            return load_document(directory, test_type).map(Arc::new);
        }

        let key = (directory.to_path_buf(), test_type.to_string());
        if let Some(document) = self.lock_cache().get(&key) {
            debug!(test_type, directory = %directory.display(), "Reference document cache hit");
            return Ok(Arc::clone(document));
        }

        // Loaded outside the lock; a concurrent load of the same key is harmless.
        let document = Arc::new(load_document(directory, test_type)?);
        self.lock_cache().insert(key, Arc::clone(&document));
        Ok(document)
    }

    /// Loads every document of the active directory.
    ///
    /// Each entry carries its own load result, so one broken file does not
    /// hide the others. With the `parallel` feature files are parsed
    /// concurrently.
    pub fn load_all(&self) -> LabRefResult<Vec<(String, LabRefResult<Arc<ReferenceDocument>>)>> {
        self.load_all_in(&self.directory())
    }

    /// Loads every document of `directory`. See [`load_all`](Self::load_all).
    pub fn load_all_in(
        &self,
        directory: &Path,
    ) -> LabRefResult<Vec<(String, LabRefResult<Arc<ReferenceDocument>>)>> {
        let test_types = discover_test_types(directory)?;

        #[cfg(feature = "parallel")]
        let loaded: Vec<_> = test_types
            .into_par_iter()
            .map(|test_type| {
                let document = self.document_in(directory, &test_type);
                (test_type, document)
            })
            .collect();

        #[cfg(not(feature = "parallel"))]
        let loaded: Vec<_> = test_types
            .into_iter()
            .map(|test_type| {
                let document = self.document_in(directory, &test_type);
                (test_type, document)
            })
            .collect();

        Ok(loaded)
    }

    /// The document for `test_type` in its on-disk JSON shape.
    pub fn export(&self, test_type: &str) -> LabRefResult<serde_json::Value> {
        let document = self.document(test_type)?;
        parser::to_value(&document).map_err(|source| LabRefError::Export {
            test_type: test_type.to_string(),
            source,
        })
    }

    /// Drops every cached document.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Number of cached documents.
    pub fn cached_count(&self) -> usize {
        self.lock_cache().len()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUPS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Test types available in the active directory, sorted.
    pub fn list_test_types(&self) -> LabRefResult<Vec<String>> {
        discover_test_types(self.directory())
    }

    /// Test names of `test_type`, in document order.
    pub fn test_keys(&self, test_type: &str) -> LabRefResult<Vec<String>> {
        self.test_keys_in(&self.directory(), test_type)
    }

    /// [`test_keys`](Self::test_keys) against `directory`.
    pub fn test_keys_in(&self, directory: &Path, test_type: &str) -> LabRefResult<Vec<String>> {
        let document = self.document_in(directory, test_type)?;
        Ok(document.test_names().map(str::to_string).collect())
    }

    /// The complete definition of a test, without sex/age filtering.
    pub fn get_definition(&self, test_type: &str, test_name: &str) -> LabRefResult<TestDefinition> {
        self.get_definition_in(&self.directory(), test_type, test_name)
    }

    /// [`get_definition`](Self::get_definition) against `directory`.
    pub fn get_definition_in(
        &self,
        directory: &Path,
        test_type: &str,
        test_name: &str,
    ) -> LabRefResult<TestDefinition> {
        let document = self.document_in(directory, test_type)?;
        find_definition(&document, test_type, test_name).cloned()
    }

    /// The range of `test_name` that applies to `sex` and `age`.
    pub fn get_reference(
        &self,
        test_type: &str,
        test_name: &str,
        sex: Option<Sex>,
        age: f64,
    ) -> LabRefResult<RangeEntry> {
        self.get_reference_in(&self.directory(), test_type, test_name, sex, age)
    }

    /// [`get_reference`](Self::get_reference) against `directory`.
    pub fn get_reference_in(
        &self,
        directory: &Path,
        test_type: &str,
        test_name: &str,
        sex: Option<Sex>,
        age: f64,
    ) -> LabRefResult<RangeEntry> {
        let document = self.document_in(directory, test_type)?;
        resolve_range(&document, test_type, test_name, sex, age).cloned()
    }

    /// Classifies one value.
    pub fn check_value(
        &self,
        test_type: &str,
        test_name: &str,
        value: f64,
        sex: Option<Sex>,
        age: f64,
    ) -> LabRefResult<Status> {
        self.check_value_in(&self.directory(), test_type, test_name, value, sex, age)
    }

    /// [`check_value`](Self::check_value) against `directory`.
    pub fn check_value_in(
        &self,
        directory: &Path,
        test_type: &str,
        test_name: &str,
        value: f64,
        sex: Option<Sex>,
        age: f64,
    ) -> LabRefResult<Status> {
        let document = self.document_in(directory, test_type)?;
        classify_value(&document, test_type, test_name, value, sex, age)
    }

    /// Classifies several values of one patient, keeping input order.
    ///
    /// Stops at the first test that cannot be classified; the error names it.
    pub fn check_values<I, K>(
        &self,
        test_type: &str,
        values: I,
        sex: Option<Sex>,
        age: f64,
    ) -> LabRefResult<Vec<(String, Status)>>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.check_values_in(&self.directory(), test_type, values, sex, age)
    }

    /// [`check_values`](Self::check_values) against `directory`.
    pub fn check_values_in<I, K>(
        &self,
        directory: &Path,
        test_type: &str,
        values: I,
        sex: Option<Sex>,
        age: f64,
    ) -> LabRefResult<Vec<(String, Status)>>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let document = self.document_in(directory, test_type)?;
        classify_values(&document, test_type, values, sex, age)
    }

    /// Starts an empty result set for one patient.
    pub fn lab_results(
        &self,
        test_type: &str,
        sex: Option<Sex>,
        age: f64,
    ) -> LabRefResult<LabResults> {
        let document = self.document(test_type)?;
        Ok(LabResults::new(test_type, document, sex, age))
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<ReferenceDocument>>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    const BLOOD_TEST: &str = r#"{
        "_info": {"name": "Blood", "description": "Complete blood count"},
        "hemoglobin": {
            "name_ru": "Гемоглобин",
            "male": [
                {"age_min": 0, "age_max": 1, "min": 110, "max": 140, "unit": "g/L"},
                {"age_min": 1, "age_max": 18, "min": 120, "max": 160, "unit": "g/L"},
                {"age_min": 18, "age_max": 150, "min": 130, "max": 170, "unit": "g/L"}
            ]
        },
        "leukocytes": {
            "all": [
                {"age_min": 18, "age_max": 150, "min": 4.0, "max": 9.0, "unit": "10^9/L"}
            ]
        }
    }"#;

    fn reference_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("blood_test.json"), BLOOD_TEST).unwrap();
        tmp
    }

    #[test]
    fn test_get_reference() {
        let tmp = reference_dir();
        let store = ReferenceStore::with_directory(tmp.path());

        let range = store
            .get_reference("blood_test", "hemoglobin", Some(Sex::Male), 25.0)
            .unwrap();
        assert_eq!(range, RangeEntry::new(18.0, 150.0, 130.0, 170.0, "g/L"));
        assert_eq!(range.classify(125.0), Status::Below);
        assert_eq!(range.classify(145.0), Status::Normal);
    }

    #[test]
    fn test_check_values() {
        let tmp = reference_dir();
        let store = ReferenceStore::with_directory(tmp.path());

        let statuses = store
            .check_values(
                "blood_test",
                [("hemoglobin", 125.0), ("leukocytes", 5.5)],
                Some(Sex::Male),
                25.0,
            )
            .unwrap();
        assert_eq!(
            statuses,
            vec![
                ("hemoglobin".to_string(), Status::Below),
                ("leukocytes".to_string(), Status::Normal),
            ]
        );
    }

    #[test]
    fn test_unknown_test_is_an_error() {
        let tmp = reference_dir();
        let store = ReferenceStore::with_directory(tmp.path());

        let err = store
            .check_value("blood_test", "nonexistent", 1.0, Some(Sex::Male), 30.0)
            .unwrap_err();
        assert!(matches!(err, LabRefError::UnknownTest { .. }));
    }

    #[test]
    fn test_definition_and_keys() {
        let tmp = reference_dir();
        let store = ReferenceStore::with_directory(tmp.path());

        assert_eq!(
            store.test_keys("blood_test").unwrap(),
            vec!["hemoglobin", "leukocytes"]
        );

        let definition = store.get_definition("blood_test", "hemoglobin").unwrap();
        assert_eq!(definition.name_ru.as_deref(), Some("Гемоглобин"));
        assert_eq!(definition.candidates(Some(Sex::Male)).count(), 3);

        assert!(matches!(
            store.get_definition("blood_test", "ph"),
            Err(LabRefError::UnknownTest { .. })
        ));
    }

    #[test]
    fn test_lookups_in_other_directory() {
        let pinned = reference_dir();
        let other = TempDir::new().unwrap();
        fs::write(
            other.path().join("blood_test.json"),
            r#"{"hemoglobin": {"male": [
                {"age_min": 18, "age_max": 150, "min": 140, "max": 180, "unit": "g/L"}
            ]}}"#,
        )
        .unwrap();
        let store = ReferenceStore::with_directory(pinned.path());

        let range = store
            .get_reference_in(other.path(), "blood_test", "hemoglobin", Some(Sex::Male), 30.0)
            .unwrap();
        assert_eq!((range.min, range.max), (140.0, 180.0));
        let status = store
            .check_value_in(other.path(), "blood_test", "hemoglobin", 135.0, Some(Sex::Male), 30.0)
            .unwrap();
        assert_eq!(status, Status::Below);
        assert_eq!(
            store.test_keys_in(other.path(), "blood_test").unwrap(),
            vec!["hemoglobin"]
        );
        assert!(matches!(
            store.get_definition_in(other.path(), "blood_test", "leukocytes"),
            Err(LabRefError::UnknownTest { .. })
        ));

        // The pinned directory is untouched and cached separately.
        assert_eq!(
            store.check_value("blood_test", "hemoglobin", 135.0, Some(Sex::Male), 30.0).unwrap(),
            Status::Normal
        );
        assert_eq!(store.cached_count(), 2);
    }

    #[test]
    fn test_documents_are_cached() {
        let tmp = reference_dir();
        let store = ReferenceStore::with_directory(tmp.path());

        let first = store.document("blood_test").unwrap();
        let second = store.document("blood_test").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.cached_count(), 1);

        store.clear_cache();
        assert_eq!(store.cached_count(), 0);
        let third = store.document("blood_test").unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(first, third);
    }

    #[test]
    fn test_uncached_store_rereads() {
        let tmp = reference_dir();
        let store =
            ReferenceStore::with_config(Some(tmp.path().to_path_buf()), StoreConfig::uncached());

        store.document("blood_test").unwrap();
        assert_eq!(store.cached_count(), 0);

        fs::write(tmp.path().join("blood_test.json"), r#"{"ph": {"all": []}}"#).unwrap();
        assert_eq!(store.test_keys("blood_test").unwrap(), vec!["ph"]);
    }

    #[test]
    fn test_missing_document() {
        let tmp = reference_dir();
        let store = ReferenceStore::with_directory(tmp.path());

        assert!(matches!(
            store.document("urine_analysis"),
            Err(LabRefError::NotFound { .. })
        ));
        assert_eq!(store.cached_count(), 0);
    }

    #[test]
    fn test_load_all_reports_each_file() {
        let tmp = reference_dir();
        fs::write(tmp.path().join("broken.json"), "[").unwrap();
        let store = ReferenceStore::with_directory(tmp.path());

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].0, "blood_test");
        assert!(loaded[0].1.is_ok());
        assert_eq!(loaded[1].0, "broken");
        assert!(matches!(loaded[1].1, Err(LabRefError::Parse { .. })));
        assert_eq!(store.cached_count(), 1);
    }

    #[test]
    fn test_export_keeps_document_order() {
        let tmp = reference_dir();
        let store = ReferenceStore::with_directory(tmp.path());

        let exported = store.export("blood_test").unwrap();
        let keys: Vec<_> = exported.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["_info", "hemoglobin", "leukocytes"]);
        assert_eq!(exported["hemoglobin"]["male"][2]["min"], 130);
        assert_eq!(exported["leukocytes"]["all"][0]["max"], 9);
    }

    #[test]
    fn test_lab_results() {
        let tmp = reference_dir();
        let store = ReferenceStore::with_directory(tmp.path());

        let mut results = store.lab_results("blood_test", Some(Sex::Male), 30.0).unwrap();
        results
            .add_results([("hemoglobin", 180.0), ("leukocytes", 6.0)])
            .unwrap();

        assert_eq!(results.title(), "Blood");
        assert_eq!(results.summary().above, 1);
        assert_eq!(results.summary().total, 2);
    }
}
