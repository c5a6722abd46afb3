//! Loader-specific types: errors and store configuration.

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::ValidationError;

/// Errors that can occur while loading documents or looking up ranges.
#[derive(Error, Debug)]
pub enum LabRefError {
    /// I/O error reading a reference document or directory.
    #[error("IO error reading reference data: {0}")]
    Io(#[from] std::io::Error),

    /// No document exists for the requested test type.
    #[error("Reference document for test type '{test_type}' not found: {path}")]
    NotFound {
        /// The requested test type.
        test_type: String,
        /// The file that was looked for.
        path: PathBuf,
    },

    /// The references directory does not exist.
    #[error("References directory not found: {path}")]
    DirectoryNotFound {
        /// The directory that was looked for.
        path: PathBuf,
    },

    /// The document content is not valid JSON.
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The document is valid JSON but has the wrong structure.
    #[error("Invalid reference document {path}: {source}")]
    Validation {
        /// The file that failed validation.
        path: PathBuf,
        /// What is wrong and where.
        #[source]
        source: ValidationError,
    },

    /// A loaded document could not be written back to JSON.
    #[error("Failed to export {test_type}: {source}")]
    Export {
        /// The exported test type.
        test_type: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The test name is not defined in the document.
    #[error("Test '{test_name}' not found in {test_type}")]
    UnknownTest {
        /// The document that was searched.
        test_type: String,
        /// The missing test name.
        test_name: String,
    },

    /// The test has no ranges for the queried sex and no `all` ranges.
    #[error("Test '{test_name}' defines no ranges for sex '{sex}'")]
    SexNotDefined {
        /// The test that was queried.
        test_name: String,
        /// The queried sex, or `unspecified`.
        sex: String,
    },

    /// No age band of the test covers the queried age.
    #[error("Test '{test_name}' has no reference range for age {age}")]
    NoMatchingRange {
        /// The test that was queried.
        test_name: String,
        /// The queried age.
        age: f64,
    },

    /// The queried age is negative or not a finite number.
    #[error("Invalid age {age} for test '{test_name}' (expected a non-negative number)")]
    InvalidAge {
        /// The test that was queried.
        test_name: String,
        /// The rejected age.
        age: f64,
    },

    /// The measured value is not a finite number.
    #[error("Invalid value {value} for test '{test_name}'")]
    InvalidValue {
        /// The test that was checked.
        test_name: String,
        /// The rejected value.
        value: f64,
    },

    /// A sex string could not be parsed.
    #[error(transparent)]
    InvalidSex(#[from] labref_types::ParseSexError),
}

impl LabRefError {
    /// Returns the test name this error is about, if it concerns a single test.
    pub fn test_name(&self) -> Option<&str> {
        match self {
            Self::UnknownTest { test_name, .. }
            | Self::SexNotDefined { test_name, .. }
            | Self::NoMatchingRange { test_name, .. }
            | Self::InvalidAge { test_name, .. }
            | Self::InvalidValue { test_name, .. } => Some(test_name),
            _ => None,
        }
    }
}

/// Result type for reference operations.
pub type LabRefResult<T> = Result<T, LabRefError>;

/// Configuration for a [`ReferenceStore`](crate::ReferenceStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether parsed documents are kept in memory between lookups.
    pub cache_documents: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_documents: true,
        }
    }
}

impl StoreConfig {
    /// Creates a config that re-reads documents from disk on every lookup.
    pub fn uncached() -> Self {
        Self {
            cache_documents: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default() {
        let config = StoreConfig::default();
        assert!(config.cache_documents);
        assert!(!StoreConfig::uncached().cache_documents);
    }

    #[test]
    fn test_error_names_test() {
        let err = LabRefError::NoMatchingRange {
            test_name: "hemoglobin".to_string(),
            age: 200.0,
        };
        assert_eq!(err.test_name(), Some("hemoglobin"));
        assert_eq!(
            err.to_string(),
            "Test 'hemoglobin' has no reference range for age 200"
        );

        let err = LabRefError::DirectoryNotFound {
            path: PathBuf::from("/nowhere"),
        };
        assert_eq!(err.test_name(), None);
    }

    #[test]
    fn test_unknown_test_message() {
        let err = LabRefError::UnknownTest {
            test_type: "blood_test".to_string(),
            test_name: "nonexistent".to_string(),
        };
        assert_eq!(err.to_string(), "Test 'nonexistent' not found in blood_test");
    }
}
