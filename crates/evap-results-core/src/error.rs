//! Request-terminal error types.
//!
//! A results request either completes or fails with one of these. There are
//! no partial payloads and no retries.

use thiserror::Error;

use crate::model::{CourseId, SemesterId};

/// Errors that end a results request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResultsError {
    /// No semester with this id exists.
    #[error("semester {0} not found")]
    SemesterNotFound(SemesterId),

    /// The course does not exist or does not belong to the semester.
    #[error("course {course} not found in semester {semester}")]
    CourseNotFound {
        semester: SemesterId,
        course: CourseId,
    },

    /// The viewer may not access this page at all.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl ResultsError {
    /// Returns `true` for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResultsError::SemesterNotFound(_) | ResultsError::CourseNotFound { .. }
        )
    }
}
