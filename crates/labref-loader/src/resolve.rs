//! Range resolution: picking the age band that applies to a patient.

use labref_types::{RangeEntry, ReferenceDocument, Sex, TestDefinition};

use crate::types::{LabRefError, LabRefResult};

/// Looks up a test definition by name.
///
/// # Errors
/// Returns [`LabRefError::UnknownTest`] if the document does not define it.
pub fn find_definition<'a>(
    document: &'a ReferenceDocument,
    test_type: &str,
    test_name: &str,
) -> LabRefResult<&'a TestDefinition> {
    document
        .get(test_name)
        .ok_or_else(|| LabRefError::UnknownTest {
            test_type: test_type.to_string(),
            test_name: test_name.to_string(),
        })
}

/// Selects the range of `definition` that applies to `sex` and `age`.
///
/// Candidates are the ranges under the sex-specific key followed by the
/// `all` ranges; the first one with `age_min <= age < age_max` wins. Without
/// a sex only the `all` ranges are considered.
///
/// # Errors
/// - [`LabRefError::InvalidAge`] for negative or non-finite ages
/// - [`LabRefError::SexNotDefined`] if neither the sex key nor `all` exists
/// - [`LabRefError::NoMatchingRange`] if no candidate covers `age`
pub fn select_range<'a>(
    definition: &'a TestDefinition,
    test_name: &str,
    sex: Option<Sex>,
    age: f64,
) -> LabRefResult<&'a RangeEntry> {
    if !age.is_finite() || age < 0.0 {
        return Err(LabRefError::InvalidAge {
            test_name: test_name.to_string(),
            age,
        });
    }

    if !definition.applies_to(sex) {
        return Err(LabRefError::SexNotDefined {
            test_name: test_name.to_string(),
            sex: sex.map_or("unspecified", Sex::as_str).to_string(),
        });
    }

    definition
        .candidates(sex)
        .find(|range| range.contains_age(age))
        .ok_or_else(|| LabRefError::NoMatchingRange {
            test_name: test_name.to_string(),
            age,
        })
}

/// Resolves the range for `test_name` in a document.
///
/// # Examples
///
/// ```
/// use labref_loader::{parser, resolve_range};
/// use labref_types::{RangeEntry, Sex};
/// use serde_json::json;
///
/// let doc = parser::from_value(&json!({
///     "hemoglobin": {"male": [
///         {"age_min": 0, "age_max": 1, "min": 110, "max": 140, "unit": "g/L"},
///         {"age_min": 1, "age_max": 18, "min": 120, "max": 160, "unit": "g/L"},
///         {"age_min": 18, "age_max": 150, "min": 130, "max": 170, "unit": "g/L"}
///     ]}
/// })).unwrap();
///
/// let range = resolve_range(&doc, "blood_test", "hemoglobin", Some(Sex::Male), 25.0).unwrap();
/// assert_eq!(range, &RangeEntry::new(18.0, 150.0, 130.0, 170.0, "g/L"));
/// ```
pub fn resolve_range<'a>(
    document: &'a ReferenceDocument,
    test_type: &str,
    test_name: &str,
    sex: Option<Sex>,
    age: f64,
) -> LabRefResult<&'a RangeEntry> {
    let definition = find_definition(document, test_type, test_name)?;
    select_range(definition, test_name, sex, age)
}
