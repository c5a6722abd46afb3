//! Classification of measured values against a reference document.

use labref_types::{RangeEntry, ReferenceDocument, Sex, Status};

use crate::resolve::resolve_range;
use crate::types::{LabRefError, LabRefResult};

/// Classifies a single value.
///
/// # Errors
/// Any resolution error for `test_name`, or [`LabRefError::InvalidValue`]
/// if `value` is not finite.
pub fn classify_value(
    document: &ReferenceDocument,
    test_type: &str,
    test_name: &str,
    value: f64,
    sex: Option<Sex>,
    age: f64,
) -> LabRefResult<Status> {
    classify_with_range(document, test_type, test_name, value, sex, age).map(|(_, status)| status)
}

/// Classifies a single value and returns the range it was checked against.
///
/// # Errors
/// Same as [`classify_value`].
pub fn classify_with_range<'a>(
    document: &'a ReferenceDocument,
    test_type: &str,
    test_name: &str,
    value: f64,
    sex: Option<Sex>,
    age: f64,
) -> LabRefResult<(&'a RangeEntry, Status)> {
    if !value.is_finite() {
        return Err(LabRefError::InvalidValue {
            test_name: test_name.to_string(),
            value,
        });
    }

    let range = resolve_range(document, test_type, test_name, sex, age)?;
    Ok((range, range.classify(value)))
}

/// Classifies several values sharing the same patient.
///
/// Results keep the input order. The batch stops at the first test that
/// cannot be classified; the returned error names that test.
///
/// # Examples
///
/// ```
/// use labref_loader::{classify_values, parser};
/// use labref_types::{Sex, Status};
/// use serde_json::json;
///
/// let doc = parser::from_value(&json!({
///     "hemoglobin": {"male": [
///         {"age_min": 18, "age_max": 150, "min": 130, "max": 170, "unit": "g/L"}
///     ]},
///     "leukocytes": {"all": [
///         {"age_min": 18, "age_max": 150, "min": 4.0, "max": 9.0, "unit": "10^9/L"}
///     ]}
/// })).unwrap();
///
/// let statuses = classify_values(
///     &doc,
///     "blood_test",
///     [("hemoglobin", 125.0), ("leukocytes", 5.5)],
///     Some(Sex::Male),
///     25.0,
/// ).unwrap();
///
/// assert_eq!(statuses, vec![
///     ("hemoglobin".to_string(), Status::Below),
///     ("leukocytes".to_string(), Status::Normal),
/// ]);
/// ```
pub fn classify_values<I, K>(
    document: &ReferenceDocument,
    test_type: &str,
    values: I,
    sex: Option<Sex>,
    age: f64,
) -> LabRefResult<Vec<(String, Status)>>
where
    I: IntoIterator<Item = (K, f64)>,
    K: AsRef<str>,
{
    values
        .into_iter()
        .map(|(name, value)| {
            let name = name.as_ref();
            let status = classify_value(document, test_type, name, value, sex, age)?;
            Ok((name.to_string(), status))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use labref_types::{SexKey, TestDefinition};

    fn document() -> ReferenceDocument {
        let mut hemoglobin = TestDefinition::new(None);
        hemoglobin.push_ranges(
            SexKey::Male,
            vec![RangeEntry::new(18.0, 150.0, 130.0, 170.0, "g/L")],
        );
        let mut leukocytes = TestDefinition::new(None);
        leukocytes.push_ranges(
            SexKey::All,
            vec![RangeEntry::new(18.0, 150.0, 4.0, 9.0, "10^9/L")],
        );

        let mut doc = ReferenceDocument::default();
        doc.insert("hemoglobin", hemoglobin);
        doc.insert("leukocytes", leukocytes);
        doc
    }

    #[test]
    fn test_classify_value() {
        let doc = document();
        let check = |v| classify_value(&doc, "blood_test", "hemoglobin", v, Some(Sex::Male), 25.0);

        assert_eq!(check(125.0).unwrap(), Status::Below);
        assert_eq!(check(145.0).unwrap(), Status::Normal);
        assert_eq!(check(130.0).unwrap(), Status::Normal);
        assert_eq!(check(170.0).unwrap(), Status::Normal);
        assert_eq!(check(180.0).unwrap(), Status::Above);
    }

    #[test]
    fn test_classify_rejects_non_finite_value() {
        let doc = document();
        let err =
            classify_value(&doc, "blood_test", "leukocytes", f64::NAN, None, 25.0).unwrap_err();
        assert!(matches!(err, LabRefError::InvalidValue { .. }));
    }

    #[test]
    fn test_classify_with_range() {
        let doc = document();
        let (range, status) =
            classify_with_range(&doc, "blood_test", "leukocytes", 3.9, None, 30.0).unwrap();
        assert_eq!(range, &RangeEntry::new(18.0, 150.0, 4.0, 9.0, "10^9/L"));
        assert_eq!(status, Status::Below);

        let err = classify_with_range(&doc, "blood_test", "leukocytes", f64::INFINITY, None, 30.0)
            .unwrap_err();
        assert!(matches!(err, LabRefError::InvalidValue { .. }));
    }

    #[test]
    fn test_classify_values_keeps_order() {
        let doc = document();
        let statuses = classify_values(
            &doc,
            "blood_test",
            vec![("leukocytes".to_string(), 12.0), ("hemoglobin".to_string(), 150.0)],
            Some(Sex::Male),
            40.0,
        )
        .unwrap();

        assert_eq!(
            statuses,
            vec![
                ("leukocytes".to_string(), Status::Above),
                ("hemoglobin".to_string(), Status::Normal),
            ]
        );
    }

    #[test]
    fn test_classify_values_aborts_naming_key() {
        let doc = document();
        let err = classify_values(
            &doc,
            "blood_test",
            [("leukocytes", 5.0), ("ferritin", 50.0), ("hemoglobin", 150.0)],
            Some(Sex::Male),
            40.0,
        )
        .unwrap_err();

        assert!(matches!(err, LabRefError::UnknownTest { .. }));
        assert_eq!(err.test_name(), Some("ferritin"));
    }

    #[test]
    fn test_classify_values_empty() {
        let doc = document();
        let statuses =
            classify_values(&doc, "blood_test", Vec::<(&str, f64)>::new(), None, 30.0).unwrap();
        assert!(statuses.is_empty());
    }
}
