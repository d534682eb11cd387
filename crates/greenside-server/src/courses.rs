//! Static course catalog loaded from `simplified_courses.json`.
//!
//! The catalog supplies the `/courses` listing and the course names used in
//! upstream call notices. A missing or unreadable file yields an empty
//! catalog so the gateway still serves cached data.

use std::collections::HashMap;
use std::path::Path;

use greenside_notifications::UNKNOWN_COURSE_NAME;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "courseId", deserialize_with = "id_as_string")]
    pub course_id: String,
    #[serde(rename = "courseName", default)]
    pub course_name: Option<String>,
    /// Remaining fields (city, state, ...) are passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "courseId must be a string or number, got {other}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct CourseFile {
    #[serde(default)]
    courses: Vec<Course>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    names: HashMap<String, String>,
}

impl CourseCatalog {
    pub fn from_courses(courses: Vec<Course>) -> Self {
        let names = courses
            .iter()
            .filter_map(|c| c.course_name.clone().map(|n| (c.course_id.clone(), n)))
            .collect();
        Self { courses, names }
    }

    /// Parses a `{"courses": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: CourseFile = serde_json::from_str(json)?;
        Ok(Self::from_courses(file.courses))
    }

    /// Loads the catalog file, falling back to an empty catalog on any error.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to read course catalog");
                return Self::default();
            }
        };
        match Self::from_json(&text) {
            Ok(catalog) => {
                tracing::info!(path = %path.display(), count = catalog.len(), "Loaded course catalog");
                catalog
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to parse course catalog");
                Self::default()
            }
        }
    }

    pub fn name_for(&self, course_id: &str) -> &str {
        self.names
            .get(course_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COURSE_NAME)
    }

    pub fn all(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
