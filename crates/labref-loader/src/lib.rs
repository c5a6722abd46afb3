//! # labref-loader
//!
//! Loader, validator and lookups for laboratory reference range documents.
//!
//! Reference data lives in a directory of JSON documents, one per test type
//! (`blood_test.json`, `urine_analysis.json`, ...). Each document maps test
//! names to sex-keyed lists of age bands. This crate validates those
//! documents, caches them, and answers two questions about a patient: which
//! range applies, and whether a measured value is below, within or above it.
//!
//! ## Features
//!
//! - `parallel` (default): Parses the documents of a directory in parallel
//!   in [`ReferenceStore::load_all`] using rayon.
//!
//! ## Directory resolution
//!
//! Calls without an explicit directory read from, in order:
//! the directory set with [`set_references_dir`], the `LAB_REF_DIR`
//! environment variable, and finally the references bundled with the crate.
//!
//! ## Usage
//!
//! ```rust
//! use labref_loader::{check_value, get_reference, bundled_references_dir};
//! use labref_types::{Sex, Status};
//!
//! let bundled = bundled_references_dir();
//! let dir = Some(bundled.as_path());
//!
//! let range = get_reference("blood_test", "hemoglobin", Some(Sex::Male), 25.0, dir)?;
//! assert_eq!((range.min, range.max), (130.0, 170.0));
//!
//! let status = check_value("blood_test", "hemoglobin", 125.0, Some(Sex::Male), 25.0, dir)?;
//! assert_eq!(status, Status::Below);
//! # Ok::<(), labref_loader::LabRefError>(())
//! ```

#![warn(missing_docs)]

mod classify;
mod global;
mod loader;
pub mod parser;
pub mod report;
mod resolve;
mod results;
mod store;
mod types;
mod validate;

// Re-export labref-types for convenience
pub use labref_types;

pub use classify::{classify_value, classify_values, classify_with_range};
pub use global::{
    check_value, check_values, directory_override, get_current_references_dir, get_definition,
    get_reference, get_test_keys, list_test_types, reference_report, reset_references_dir,
    set_references_dir, test_names_report, test_types_report,
};
pub use loader::{
    bundled_references_dir, discover_test_types, document_path, load_document, parse_document,
    resolve_directory,
};
pub use resolve::{find_definition, resolve_range, select_range};
pub use results::{LabResults, Summary, TestResult};
pub use store::ReferenceStore;
pub use types::{LabRefError, LabRefResult, StoreConfig};
pub use validate::{validate, ValidationError, ValidationResult, ROOT_PATH};
