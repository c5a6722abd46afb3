//! Sex of the patient and the sex keys used in reference documents.

use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a recognized sex or sex key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSexError(pub String);

impl fmt::Display for ParseSexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sex '{}' (expected male or female)", self.0)
    }
}

impl std::error::Error for ParseSexError {}

/// Sex of the patient a value was measured for.
///
/// # Examples
///
/// ```
/// use labref_types::Sex;
///
/// let sex: Sex = "Female".parse().unwrap();
/// assert_eq!(sex, Sex::Female);
/// assert_eq!(sex.as_str(), "female");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Sex {
    /// Male patient.
    Male,
    /// Female patient.
    Female,
}

impl Sex {
    /// Returns the lowercase name used in reference documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Returns the document key holding ranges specific to this sex.
    pub fn key(self) -> SexKey {
        match self {
            Self::Male => SexKey::Male,
            Self::Female => SexKey::Female,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ParseSexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(ParseSexError(s.to_string())),
        }
    }
}

/// Key under which a test definition stores a sequence of ranges.
///
/// `All` ranges apply regardless of the queried sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SexKey {
    /// Ranges for male patients.
    Male,
    /// Ranges for female patients.
    Female,
    /// Ranges for any patient.
    All,
}

impl SexKey {
    /// Every recognized key.
    pub const ALL_KEYS: [SexKey; 3] = [Self::Male, Self::Female, Self::All];

    /// Returns the key as written in reference documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::All => "all",
        }
    }

    /// Parses a document key. Keys are case-sensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl fmt::Display for SexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
