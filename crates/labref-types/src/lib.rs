//! # labref-types
//!
//! Type definitions for laboratory reference ranges.
//!
//! This crate provides the plain data types shared by the reference loader:
//! reference documents, test definitions, age-banded range entries, and the
//! status a measured value is classified into.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use labref_types::{RangeEntry, Sex, SexKey, Status, TestDefinition};
//!
//! let mut hemoglobin = TestDefinition::new(Some("Гемоглобин".to_string()));
//! hemoglobin.push_ranges(SexKey::Male, vec![
//!     RangeEntry::new(0.0, 1.0, 110.0, 140.0, "g/L"),
//!     RangeEntry::new(1.0, 18.0, 120.0, 160.0, "g/L"),
//!     RangeEntry::new(18.0, 150.0, 130.0, 170.0, "g/L"),
//! ]);
//!
//! let range = hemoglobin
//!     .candidates(Some(Sex::Male))
//!     .find(|r| r.contains_age(25.0))
//!     .unwrap();
//!
//! assert_eq!(range.classify(125.0), Status::Below);
//! assert_eq!(range.classify(145.0), Status::Normal);
//! ```
//!
//! ## Without Serde
//!
//! ```toml
//! [dependencies]
//! labref-types = { version = "0.1", default-features = false }
//! ```

#![warn(missing_docs)]

mod definition;
mod document;
mod range;
#[cfg(feature = "serde")]
mod serde_impl;
mod sex;
pub mod well_known;

// Re-export all public types at crate root
pub use definition::TestDefinition;
pub use document::{DocumentInfo, ReferenceDocument};
pub use range::{RangeEntry, Status};
pub use sex::{ParseSexError, Sex, SexKey};
