//! Conversion between JSON values and typed reference documents.
//!
//! [`from_value`] validates before converting, so a document returned from
//! it always satisfies the structural invariants. [`to_value`] produces the
//! on-disk shape again and is used by the export path.

use serde::Deserialize;
use serde_json::Value;

use labref_types::ReferenceDocument;

use crate::validate::{validate, ValidationError, ROOT_PATH};

/// Validates a JSON value and converts it into a [`ReferenceDocument`].
///
/// # Errors
/// Returns the first structural defect found by [`validate`].
pub fn from_value(value: &Value) -> Result<ReferenceDocument, ValidationError> {
    validate(value)?;
    ReferenceDocument::deserialize(value)
        .map_err(|e| ValidationError::new(ROOT_PATH, e.to_string()))
}

/// Converts a document back into its JSON representation.
///
/// Key order follows the document: `_info` first, then tests in order.
/// Whole numbers are written as integers.
pub fn to_value(document: &ReferenceDocument) -> serde_json::Result<Value> {
    serde_json::to_value(document)
}
