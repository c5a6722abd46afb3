//! Structural validation of reference documents.
//!
//! Runs over a parsed [`serde_json::Value`] before it is converted into a
//! typed document, so that a broken file is reported with the exact path of
//! the defect instead of failing somewhere during lookup.
//!
//! Checks run in document order and stop at the first failure:
//!
//! 1. the root is an object;
//! 2. every entry other than `_info` is an object;
//! 3. `_info`, if present, is an object with a string `name` and an optional
//!    string `description`;
//! 4. every key of a test definition other than `name_ru` is a sex key
//!    (`male`, `female`, `all`) holding an array, `name_ru` is a string, and
//!    at least one sex key is present;
//! 5. every range entry is an object with exactly the keys `age_min`,
//!    `age_max`, `min`, `max`, `unit`, numeric bounds, non-negative ages,
//!    `age_min < age_max`, `min <= max` and a non-empty unit.
//!
//! Overlapping age bands are accepted; lookups take the first match.

use serde_json::{Map, Value};
use thiserror::Error;

use labref_types::well_known::{
    AGE_MAX_KEY, AGE_MIN_KEY, INFO_DESCRIPTION_KEY, INFO_KEY, INFO_NAME_KEY, MAX_KEY, MIN_KEY,
    NAME_RU_KEY, RANGE_ENTRY_KEYS, UNIT_KEY,
};
use labref_types::SexKey;

/// Path used for defects of the document root.
pub const ROOT_PATH: &str = "<root>";

/// A structural defect in a reference document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {message}")]
pub struct ValidationError {
    /// Location of the defect, e.g. `hemoglobin.male[0]`.
    pub path: String,
    /// What is wrong at that location.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of validating a document.
pub type ValidationResult = Result<(), ValidationError>;

/// Validates the structure of a parsed reference document.
///
/// # Examples
///
/// ```
/// use labref_loader::validate;
/// use serde_json::json;
///
/// let doc = json!({
///     "hemoglobin": {
///         "male": [{"age_min": 0, "age_max": 1, "min": 110, "max": 140}]
///     }
/// });
///
/// let err = validate(&doc).unwrap_err();
/// assert_eq!(err.path, "hemoglobin.male[0]");
/// assert!(err.message.contains("unit"));
/// ```
pub fn validate(document: &Value) -> ValidationResult {
    let root = document
        .as_object()
        .ok_or_else(|| ValidationError::new(ROOT_PATH, "document root must be an object"))?;

    for (key, value) in root {
        if key == INFO_KEY {
            validate_info(value)?;
        } else {
            validate_definition(key, value)?;
        }
    }

    Ok(())
}

fn validate_info(value: &Value) -> ValidationResult {
    let info = value
        .as_object()
        .ok_or_else(|| ValidationError::new(INFO_KEY, "metadata must be an object"))?;

    match info.get(INFO_NAME_KEY) {
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(ValidationError::new(
                format!("{INFO_KEY}.{INFO_NAME_KEY}"),
                "metadata name must be a string",
            ))
        }
        None => {
            return Err(ValidationError::new(
                INFO_KEY,
                format!("missing key '{INFO_NAME_KEY}'"),
            ))
        }
    }

    if let Some(description) = info.get(INFO_DESCRIPTION_KEY) {
        if !description.is_string() {
            return Err(ValidationError::new(
                format!("{INFO_KEY}.{INFO_DESCRIPTION_KEY}"),
                "metadata description must be a string",
            ));
        }
    }

    Ok(())
}

fn validate_definition(test_name: &str, value: &Value) -> ValidationResult {
    let definition = value.as_object().ok_or_else(|| {
        ValidationError::new(
            test_name,
            format!("test definition must be an object, found {}", kind(value)),
        )
    })?;

    let mut sex_keys = 0;
    for (key, entries) in definition {
        let path = format!("{test_name}.{key}");

        if key == NAME_RU_KEY {
            if !entries.is_string() {
                return Err(ValidationError::new(path, "name_ru must be a string"));
            }
            continue;
        }

        if SexKey::from_key(key).is_none() {
            return Err(ValidationError::new(
                path,
                format!("unknown sex key '{key}' (expected male, female or all)"),
            ));
        }

        let entries = entries.as_array().ok_or_else(|| {
            ValidationError::new(
                path.as_str(),
                format!("ranges must be an array, found {}", kind(entries)),
            )
        })?;

        for (index, entry) in entries.iter().enumerate() {
            validate_entry(&format!("{path}[{index}]"), entry)?;
        }
        sex_keys += 1;
    }

    if sex_keys == 0 {
        return Err(ValidationError::new(
            test_name,
            "test definition has no male, female or all ranges",
        ));
    }

    Ok(())
}

fn validate_entry(path: &str, value: &Value) -> ValidationResult {
    let entry = value.as_object().ok_or_else(|| {
        ValidationError::new(
            path,
            format!("range entry must be an object, found {}", kind(value)),
        )
    })?;

    for key in RANGE_ENTRY_KEYS {
        if !entry.contains_key(key) {
            return Err(ValidationError::new(path, format!("missing key '{key}'")));
        }
    }

    if let Some(extra) = entry.keys().find(|k| !RANGE_ENTRY_KEYS.contains(&k.as_str())) {
        return Err(ValidationError::new(
            path,
            format!("unexpected key '{extra}'"),
        ));
    }

    let age_min = number(entry, path, AGE_MIN_KEY)?;
    let age_max = number(entry, path, AGE_MAX_KEY)?;
    let min = number(entry, path, MIN_KEY)?;
    let max = number(entry, path, MAX_KEY)?;

    if age_min < 0.0 || age_max < 0.0 {
        return Err(ValidationError::new(
            path,
            format!("age bounds must be non-negative, found {age_min}-{age_max}"),
        ));
    }
    if age_min >= age_max {
        return Err(ValidationError::new(
            path,
            format!("age_min ({age_min}) must be less than age_max ({age_max})"),
        ));
    }
    if min > max {
        return Err(ValidationError::new(
            path,
            format!("min ({min}) must not exceed max ({max})"),
        ));
    }

    match entry.get(UNIT_KEY) {
        Some(Value::String(unit)) if !unit.trim().is_empty() => Ok(()),
        Some(Value::String(_)) => Err(ValidationError::new(
            format!("{path}.{UNIT_KEY}"),
            "unit must not be empty",
        )),
        _ => Err(ValidationError::new(
            format!("{path}.{UNIT_KEY}"),
            "unit must be a string",
        )),
    }
}

fn number(entry: &Map<String, Value>, path: &str, key: &str) -> Result<f64, ValidationError> {
    entry
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            ValidationError::new(format!("{path}.{key}"), format!("{key} must be a number"))
        })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
