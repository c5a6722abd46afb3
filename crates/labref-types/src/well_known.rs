//! Well-known keys and names used by reference documents.
//!
//! # Examples
//!
//! ```
//! use labref_types::well_known;
//!
//! assert_eq!(well_known::INFO_KEY, "_info");
//! assert!(well_known::RANGE_ENTRY_KEYS.contains(&"unit"));
//! ```

// =============================================================================
// Document keys
// =============================================================================

/// Top-level metadata entry of a reference document.
pub const INFO_KEY: &str = "_info";

/// Metadata field holding the display name of a document.
pub const INFO_NAME_KEY: &str = "name";

/// Metadata field holding the free-text description of a document.
pub const INFO_DESCRIPTION_KEY: &str = "description";

/// Test definition field holding the Russian display name.
pub const NAME_RU_KEY: &str = "name_ru";

// =============================================================================
// Range entry keys
// =============================================================================

/// Lower bound of the age band (inclusive).
pub const AGE_MIN_KEY: &str = "age_min";

/// Upper bound of the age band (exclusive).
pub const AGE_MAX_KEY: &str = "age_max";

/// Lower bound of the normal range (inclusive).
pub const MIN_KEY: &str = "min";

/// Upper bound of the normal range (inclusive).
pub const MAX_KEY: &str = "max";

/// Unit of measurement.
pub const UNIT_KEY: &str = "unit";

/// The exact key set of a range entry, in canonical order.
pub const RANGE_ENTRY_KEYS: [&str; 5] = [AGE_MIN_KEY, AGE_MAX_KEY, MIN_KEY, MAX_KEY, UNIT_KEY];

// =============================================================================
// Environment
// =============================================================================

/// Environment variable naming a directory of reference documents.
pub const REFERENCES_DIR_ENV: &str = "LAB_REF_DIR";

/// File extension of reference documents.
pub const DOCUMENT_EXTENSION: &str = "json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_entry_keys_are_distinct() {
        for (i, a) in RANGE_ENTRY_KEYS.iter().enumerate() {
            for b in &RANGE_ENTRY_KEYS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
