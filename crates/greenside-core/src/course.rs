//! Course identifiers, data kinds and the cache keys derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Identifier of a course at the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    /// Creates a course ID, rejecting empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::invalid_course_id(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CourseId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The category of course data a client asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Green locations per hole.
    Coordinates,
    /// Par tables.
    Info,
}

impl DataKind {
    /// Prefix used when deriving cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Coordinates => "coordinates",
            DataKind::Info => "info",
        }
    }

    /// Label used in notifications ("POI" for coordinates, "Info" for course info).
    pub fn notice_label(&self) -> &'static str {
        match self {
            DataKind::Coordinates => "POI",
            DataKind::Info => "Info",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coordinates" => Ok(DataKind::Coordinates),
            "info" => Ok(DataKind::Info),
            _ => Err(CoreError::unknown_data_kind(s)),
        }
    }
}

/// Store key for one (kind, course) pair: `"<kind>_<courseID>"`.
///
/// The format is shared by every process that writes to the store, so it
/// must never change without migrating existing rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(kind: DataKind, course_id: &CourseId) -> Self {
        Self(format!("{}_{}", kind.as_str(), course_id.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
