//! Reference range entries and value classification.
//!
//! A [`RangeEntry`] is one age band of a test definition: the normal
//! interval `[min, max]` for patients aged `age_min <= age < age_max`.

use std::fmt;

/// Position of a measured value relative to its reference range.
///
/// # Examples
///
/// ```
/// use labref_types::Status;
///
/// assert_eq!(Status::Below.as_str(), "below");
/// assert!(Status::Above.is_abnormal());
/// assert!(!Status::Normal.is_abnormal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Status {
    /// Value is lower than the range minimum.
    Below,
    /// Value lies within the range, bounds included.
    Normal,
    /// Value is higher than the range maximum.
    Above,
}

impl Status {
    /// Returns the lowercase status name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Below => "below",
            Self::Normal => "normal",
            Self::Above => "above",
        }
    }

    /// Returns true for `Below` and `Above`.
    pub fn is_abnormal(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Returns the single-character marker used in reports.
    pub fn marker(self) -> char {
        match self {
            Self::Below => '↓',
            Self::Normal => '✓',
            Self::Above => '↑',
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single age band of a reference range.
///
/// # Examples
///
/// ```
/// use labref_types::{RangeEntry, Status};
///
/// let adult = RangeEntry::new(18.0, 150.0, 130.0, 170.0, "g/L");
///
/// assert!(adult.contains_age(25.0));
/// assert!(!adult.contains_age(150.0));
/// assert_eq!(adult.classify(125.0), Status::Below);
/// assert_eq!(adult.classify(130.0), Status::Normal);
/// assert_eq!(adult.classify(170.5), Status::Above);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeEntry {
    /// Lower bound of the age band, inclusive.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde_impl::serialize_number"))]
    pub age_min: f64,
    /// Upper bound of the age band, exclusive.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde_impl::serialize_number"))]
    pub age_max: f64,
    /// Lowest normal value, inclusive.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde_impl::serialize_number"))]
    pub min: f64,
    /// Highest normal value, inclusive.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde_impl::serialize_number"))]
    pub max: f64,
    /// Unit the bounds are expressed in.
    pub unit: String,
}

impl RangeEntry {
    /// Creates a range entry.
    pub fn new(age_min: f64, age_max: f64, min: f64, max: f64, unit: impl Into<String>) -> Self {
        Self {
            age_min,
            age_max,
            min,
            max,
            unit: unit.into(),
        }
    }

    /// Returns true if `age_min <= age < age_max`.
    pub fn contains_age(&self, age: f64) -> bool {
        self.age_min <= age && age < self.age_max
    }

    /// Classifies a value against this range. Both bounds are normal.
    pub fn classify(&self, value: f64) -> Status {
        if value < self.min {
            Status::Below
        } else if value > self.max {
            Status::Above
        } else {
            Status::Normal
        }
    }
}

impl fmt::Display for RangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {} (age {}-{})",
            self.min, self.max, self.unit, self.age_min, self.age_max
        )
    }
}
