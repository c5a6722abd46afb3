//! Result sets: several measured values of one patient for one test type.

use std::sync::Arc;

use serde::Serialize;

use labref_types::{RangeEntry, ReferenceDocument, Sex, Status};

use crate::classify::classify_with_range;
use crate::types::LabRefResult;

/// One measured value together with the range it was checked against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Test name as used in the reference document.
    pub test_name: String,
    /// Russian display name, if the document has one.
    pub name_ru: Option<String>,
    /// The measured value.
    pub value: f64,
    /// The range that applied to the patient.
    pub range: RangeEntry,
    /// Classification of `value` against `range`.
    pub status: Status,
}

impl TestResult {
    /// Display name: `name_ru` when present, otherwise the test name.
    pub fn display_name(&self) -> &str {
        self.name_ru.as_deref().unwrap_or(&self.test_name)
    }
}

/// Counts of results per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    /// Results within range.
    pub normal: usize,
    /// Results below range.
    pub below: usize,
    /// Results above range.
    pub above: usize,
    /// All results.
    pub total: usize,
}

/// Checked values of one patient against one reference document.
///
/// Created by [`ReferenceStore::lab_results`](crate::ReferenceStore::lab_results).
/// Results keep insertion order; adding a test again replaces its result in
/// place.
#[derive(Debug, Clone)]
pub struct LabResults {
    test_type: String,
    document: Arc<ReferenceDocument>,
    sex: Option<Sex>,
    age: f64,
    results: Vec<TestResult>,
}

impl LabResults {
    /// Creates an empty result set.
    pub fn new(
        test_type: impl Into<String>,
        document: Arc<ReferenceDocument>,
        sex: Option<Sex>,
        age: f64,
    ) -> Self {
        Self {
            test_type: test_type.into(),
            document,
            sex,
            age,
            results: Vec::new(),
        }
    }

    /// The test type the results belong to.
    pub fn test_type(&self) -> &str {
        &self.test_type
    }

    /// Title of the reference document.
    pub fn title(&self) -> &str {
        self.document.title(&self.test_type)
    }

    /// Sex of the patient.
    pub fn sex(&self) -> Option<Sex> {
        self.sex
    }

    /// Age of the patient.
    pub fn age(&self) -> f64 {
        self.age
    }

    /// Checks `value` for `test_name` and records the result.
    ///
    /// # Errors
    /// Any resolution error; nothing is recorded in that case.
    pub fn add_result(&mut self, test_name: &str, value: f64) -> LabRefResult<&mut Self> {
        let result = self.check(test_name, value)?;
        self.record(result);
        Ok(self)
    }

    /// Checks and records several values.
    ///
    /// Either every value is recorded or, on the first failure, none is.
    pub fn add_results<I, K>(&mut self, values: I) -> LabRefResult<&mut Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let checked = values
            .into_iter()
            .map(|(name, value)| self.check(name.as_ref(), value))
            .collect::<LabRefResult<Vec<_>>>()?;

        for result in checked {
            self.record(result);
        }
        Ok(self)
    }

    /// Returns the result for `test_name`, if recorded.
    pub fn get(&self, test_name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.test_name == test_name)
    }

    /// Returns true if a result for `test_name` is recorded.
    pub fn contains(&self, test_name: &str) -> bool {
        self.get(test_name).is_some()
    }

    /// All results in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter()
    }

    /// Results outside their range.
    pub fn abnormal(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.status.is_abnormal())
    }

    /// Results within their range.
    pub fn normal(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.status.is_abnormal())
    }

    /// Returns true if any result is outside its range.
    pub fn has_abnormalities(&self) -> bool {
        self.abnormal().next().is_some()
    }

    /// Counts results per status.
    pub fn summary(&self) -> Summary {
        self.results.iter().fold(Summary::default(), |mut acc, r| {
            match r.status {
                Status::Normal => acc.normal += 1,
                Status::Below => acc.below += 1,
                Status::Above => acc.above += 1,
            }
            acc.total += 1;
            acc
        })
    }

    /// Number of recorded results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn check(&self, test_name: &str, value: f64) -> LabRefResult<TestResult> {
        let (range, status) = classify_with_range(
            &self.document,
            &self.test_type,
            test_name,
            value,
            self.sex,
            self.age,
        )?;
        let name_ru = self
            .document
            .get(test_name)
            .and_then(|def| def.name_ru.clone());

        Ok(TestResult {
            test_name: test_name.to_string(),
            name_ru,
            value,
            range: range.clone(),
            status,
        })
    }

    fn record(&mut self, result: TestResult) {
        match self.results.iter_mut().find(|r| r.test_name == result.test_name) {
            Some(existing) => *existing = result,
            None => self.results.push(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labref_types::{DocumentInfo, SexKey, TestDefinition};
    use serde_json::json;

    use crate::types::LabRefError;

    fn results() -> LabResults {
        let mut hemoglobin = TestDefinition::new(Some("Гемоглобин".to_string()));
        hemoglobin.push_ranges(
            SexKey::Female,
            vec![RangeEntry::new(18.0, 150.0, 120.0, 150.0, "g/L")],
        );
        let mut leukocytes = TestDefinition::new(None);
        leukocytes.push_ranges(
            SexKey::All,
            vec![RangeEntry::new(18.0, 150.0, 4.0, 9.0, "10^9/L")],
        );

        let mut doc = ReferenceDocument::new(Some(DocumentInfo {
            name: "Общий анализ крови".to_string(),
            description: None,
        }));
        doc.insert("hemoglobin", hemoglobin);
        doc.insert("leukocytes", leukocytes);

        LabResults::new("blood_test", Arc::new(doc), Some(Sex::Female), 25.0)
    }

    #[test]
    fn test_add_results_and_summary() {
        let mut lab = results();
        lab.add_results([("hemoglobin", 100.0), ("leukocytes", 6.5)])
            .unwrap();

        assert_eq!(lab.len(), 2);
        assert!(lab.contains("hemoglobin"));
        assert!(lab.has_abnormalities());
        assert_eq!(lab.abnormal().count(), 1);
        assert_eq!(lab.normal().next().unwrap().test_name, "leukocytes");
        assert_eq!(
            lab.summary(),
            Summary {
                normal: 1,
                below: 1,
                above: 0,
                total: 2
            }
        );

        let hb = lab.get("hemoglobin").unwrap();
        assert_eq!(hb.display_name(), "Гемоглобин");
        assert_eq!(hb.status, Status::Below);
        assert_eq!(hb.range.min, 120.0);
        assert_eq!(lab.get("leukocytes").unwrap().display_name(), "leukocytes");
    }

    #[test]
    fn test_add_result_replaces_in_place() {
        let mut lab = results();
        lab.add_result("hemoglobin", 100.0)
            .unwrap()
            .add_result("leukocytes", 5.0)
            .unwrap()
            .add_result("hemoglobin", 130.0)
            .unwrap();

        let names: Vec<_> = lab.iter().map(|r| r.test_name.as_str()).collect();
        assert_eq!(names, vec!["hemoglobin", "leukocytes"]);
        assert!(!lab.has_abnormalities());
    }

    #[test]
    fn test_add_results_is_all_or_nothing() {
        let mut lab = results();
        let err = lab
            .add_results([("leukocytes", 5.0), ("ph", 7.4)])
            .unwrap_err();

        assert_eq!(err.test_name(), Some("ph"));
        assert!(lab.is_empty());
    }

    #[test]
    fn test_non_finite_value_is_rejected() {
        let mut lab = results();
        let err = lab.add_result("leukocytes", f64::NAN).unwrap_err();
        assert!(matches!(err, LabRefError::InvalidValue { .. }));
        assert!(lab.is_empty());
    }

    #[test]
    fn test_results_serialize() {
        let mut lab = results();
        lab.add_results([("hemoglobin", 100.0), ("leukocytes", 6.5)])
            .unwrap();

        let hb = serde_json::to_value(lab.get("hemoglobin").unwrap()).unwrap();
        assert_eq!(
            hb,
            json!({
                "test_name": "hemoglobin",
                "name_ru": "Гемоглобин",
                "value": 100.0,
                "range": {"age_min": 18, "age_max": 150, "min": 120, "max": 150, "unit": "g/L"},
                "status": "below"
            })
        );

        assert_eq!(
            serde_json::to_value(lab.summary()).unwrap(),
            json!({"normal": 1, "below": 1, "above": 0, "total": 2})
        );
    }

    #[test]
    fn test_patient_accessors() {
        let lab = results();
        assert_eq!(lab.test_type(), "blood_test");
        assert_eq!(lab.title(), "Общий анализ крови");
        assert_eq!(lab.sex(), Some(Sex::Female));
        assert_eq!(lab.age(), 25.0);
        assert_eq!(lab.summary(), Summary::default());
    }
}
