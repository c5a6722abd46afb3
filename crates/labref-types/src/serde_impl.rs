//! Serde support in the on-disk document shape.
//!
//! A document serializes as `{"_info": {...}, "<test>": {"name_ru": ..., "male": [...]}}`
//! with `_info` first and tests in document order, so a parsed file writes
//! back to the same JSON.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::well_known::{INFO_KEY, NAME_RU_KEY};
use crate::{ReferenceDocument, SexKey, TestDefinition};

const DEFINITION_FIELDS: &[&str] = &[NAME_RU_KEY, "male", "female", "all"];

/// Writes whole numbers as integers so `130` does not come back as `130.0`.
pub(crate) fn serialize_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl Serialize for ReferenceDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.len() + usize::from(self.info.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(info) = &self.info {
            map.serialize_entry(INFO_KEY, info)?;
        }
        for (test_name, definition) in self.iter() {
            map.serialize_entry(test_name, definition)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ReferenceDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = ReferenceDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a reference document object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut document = ReferenceDocument::default();
                while let Some(key) = access.next_key::<String>()? {
                    if key == INFO_KEY {
                        document.info = Some(access.next_value()?);
                    } else {
                        let definition: TestDefinition = access.next_value()?;
                        document.insert(key, definition);
                    }
                }
                Ok(document)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

impl Serialize for TestDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.ranges.len() + usize::from(self.name_ru.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(name_ru) = &self.name_ru {
            map.serialize_entry(NAME_RU_KEY, name_ru)?;
        }
        for (key, entries) in &self.ranges {
            map.serialize_entry(key.as_str(), entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TestDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DefinitionVisitor;

        impl<'de> Visitor<'de> for DefinitionVisitor {
            type Value = TestDefinition;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a test definition object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut definition = TestDefinition::default();
                while let Some(key) = access.next_key::<String>()? {
                    if key == NAME_RU_KEY {
                        definition.name_ru = Some(access.next_value()?);
                        continue;
                    }
                    match SexKey::from_key(&key) {
                        Some(sex_key) => definition.push_ranges(sex_key, access.next_value()?),
                        None => return Err(de::Error::unknown_field(&key, DEFINITION_FIELDS)),
                    }
                }
                Ok(definition)
            }
        }

        deserializer.deserialize_map(DefinitionVisitor)
    }
}
