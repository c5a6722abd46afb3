//! Reference documents: one per test type.

use crate::TestDefinition;

/// Optional `_info` metadata of a reference document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentInfo {
    /// Display name of the test type.
    pub name: String,
    /// Free-text description.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,
}

/// All test definitions of one test type, in document order.
///
/// With the `serde` feature it (de)serializes in the JSON file shape.
///
/// # Examples
///
/// ```
/// use labref_types::{DocumentInfo, ReferenceDocument, TestDefinition};
///
/// let mut doc = ReferenceDocument::new(Some(DocumentInfo {
///     name: "Complete blood count".to_string(),
///     description: None,
/// }));
/// doc.insert("hemoglobin", TestDefinition::default());
///
/// assert_eq!(doc.title("blood_test"), "Complete blood count");
/// assert!(doc.contains("hemoglobin"));
/// assert_eq!(doc.test_names().collect::<Vec<_>>(), vec!["hemoglobin"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceDocument {
    /// `_info` metadata, if the document has it.
    pub info: Option<DocumentInfo>,
    tests: Vec<(String, TestDefinition)>,
}

impl ReferenceDocument {
    /// Creates an empty document.
    pub fn new(info: Option<DocumentInfo>) -> Self {
        Self {
            info,
            tests: Vec::new(),
        }
    }

    /// Inserts a definition, replacing any existing one with the same name
    /// while keeping its position.
    pub fn insert(&mut self, test_name: impl Into<String>, definition: TestDefinition) {
        let test_name = test_name.into();
        match self.tests.iter_mut().find(|(name, _)| *name == test_name) {
            Some((_, existing)) => *existing = definition,
            None => self.tests.push((test_name, definition)),
        }
    }

    /// Looks up a definition by test name.
    pub fn get(&self, test_name: &str) -> Option<&TestDefinition> {
        self.tests
            .iter()
            .find(|(name, _)| name == test_name)
            .map(|(_, def)| def)
    }

    /// Returns true if the document defines `test_name`.
    pub fn contains(&self, test_name: &str) -> bool {
        self.get(test_name).is_some()
    }

    /// Test names in document order.
    pub fn test_names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|(name, _)| name.as_str())
    }

    /// Definitions with their names, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TestDefinition)> {
        self.tests.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Number of test definitions.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns true if the document defines no tests.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Display title: `_info.name` when present, otherwise `fallback`.
    pub fn title<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.info
            .as_ref()
            .map(|info| info.name.as_str())
            .unwrap_or(fallback)
    }

    /// Description from `_info`, if any.
    pub fn description(&self) -> Option<&str> {
        self.info.as_ref().and_then(|info| info.description.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let mut doc = ReferenceDocument::default();
        doc.insert("hemoglobin", TestDefinition::default());
        doc.insert("leukocytes", TestDefinition::default());
        doc.insert(
            "hemoglobin",
            TestDefinition::new(Some("Гемоглобин".to_string())),
        );

        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc.test_names().collect::<Vec<_>>(),
            vec!["hemoglobin", "leukocytes"]
        );
        assert_eq!(
            doc.get("hemoglobin").and_then(|d| d.name_ru.as_deref()),
            Some("Гемоглобин")
        );
    }

    #[test]
    fn test_title_and_description_fallbacks() {
        let doc = ReferenceDocument::default();
        assert!(doc.is_empty());
        assert_eq!(doc.title("urine_analysis"), "urine_analysis");
        assert_eq!(doc.description(), None);
    }
}
