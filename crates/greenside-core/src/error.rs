use thiserror::Error;

/// Core error types for Greenside operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid course ID: {0}")]
    InvalidCourseId(String),

    #[error("Unknown data kind: {0}")]
    UnknownDataKind(String),
}

impl CoreError {
    /// Create a new InvalidCourseId error
    pub fn invalid_course_id(id: impl Into<String>) -> Self {
        Self::InvalidCourseId(id.into())
    }

    /// Create a new UnknownDataKind error
    pub fn unknown_data_kind(kind: impl Into<String>) -> Self {
        Self::UnknownDataKind(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_course_id("");
        assert_eq!(err.to_string(), "Invalid course ID: ");

        let err = CoreError::unknown_data_kind("tees");
        assert_eq!(err.to_string(), "Unknown data kind: tees");
    }
}
