//! Test definitions: the sex-keyed range tables of a single test.

use crate::{RangeEntry, Sex, SexKey};

/// Reference ranges of a single test, grouped by sex key.
///
/// Groups keep the order in which they appear in the source document.
///
/// # Examples
///
/// ```
/// use labref_types::{RangeEntry, Sex, SexKey, TestDefinition};
///
/// let mut definition = TestDefinition::new(Some("Лейкоциты".to_string()));
/// definition.push_ranges(SexKey::All, vec![
///     RangeEntry::new(18.0, 150.0, 4.0, 9.0, "10^9/L"),
/// ]);
///
/// assert!(definition.applies_to(Some(Sex::Male)));
/// assert_eq!(definition.candidates(Some(Sex::Female)).count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestDefinition {
    /// Russian display name, when the document provides one.
    pub name_ru: Option<String>,
    /// Range groups in document order.
    pub ranges: Vec<(SexKey, Vec<RangeEntry>)>,
}

impl TestDefinition {
    /// Creates a definition with no ranges.
    pub fn new(name_ru: Option<String>) -> Self {
        Self {
            name_ru,
            ranges: Vec::new(),
        }
    }

    /// Appends a range group. A repeated key replaces the earlier group.
    pub fn push_ranges(&mut self, key: SexKey, entries: Vec<RangeEntry>) {
        match self.ranges.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = entries,
            None => self.ranges.push((key, entries)),
        }
    }

    /// Returns the ranges stored under `key`.
    pub fn ranges_for(&self, key: SexKey) -> Option<&[RangeEntry]> {
        self.ranges
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, entries)| entries.as_slice())
    }

    /// Returns true if a query for `sex` has any range group to look at.
    ///
    /// A query without sex only looks at `all` ranges.
    pub fn applies_to(&self, sex: Option<Sex>) -> bool {
        let specific = sex.is_some_and(|s| self.ranges_for(s.key()).is_some());
        specific || self.ranges_for(SexKey::All).is_some()
    }

    /// Candidate ranges for `sex`: the sex-specific group first, then `all`.
    pub fn candidates(&self, sex: Option<Sex>) -> impl Iterator<Item = &RangeEntry> {
        let specific = sex.and_then(|s| self.ranges_for(s.key())).unwrap_or(&[]);
        let shared = self.ranges_for(SexKey::All).unwrap_or(&[]);
        specific.iter().chain(shared.iter())
    }

    /// Returns the unit of the first range, if any.
    pub fn unit(&self) -> Option<&str> {
        self.ranges
            .iter()
            .find_map(|(_, entries)| entries.first())
            .map(|entry| entry.unit.as_str())
    }

    /// Display name: the Russian name when present, otherwise `fallback`.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name_ru.as_deref().unwrap_or(fallback)
    }
}
