//! Collaborator traits at the edges of the results pipeline.
//!
//! The pipeline never queries storage or computes statistics itself. It is
//! handed an [`EvaluationStore`] for records, a [`ResultCalculator`] for raw
//! sections and grade distributions, and a [`CoursePolicy`] for the
//! per-course entitlement checks.

use crate::distribution::{self, Distribution};
use crate::model::{Course, CourseId, Degree, Semester, SemesterId, Viewer};
use crate::results::Section;

// ---------------------------------------------------------------------------
// Data access
// ---------------------------------------------------------------------------

/// Read-only access to semesters, courses, and the degree catalog.
pub trait EvaluationStore {
    /// All semesters in data-layer order.
    fn semesters(&self) -> Vec<Semester>;

    fn semester(&self, id: SemesterId) -> Option<Semester>;

    /// A course, only if it belongs to the given semester.
    fn course(&self, semester: SemesterId, course: CourseId) -> Option<Course>;

    /// Courses of a semester in data-layer order.
    fn courses_of(&self, semester: SemesterId) -> Vec<Course>;

    /// The degree catalog in its natural order.
    fn degrees(&self) -> Vec<Degree>;
}

// ---------------------------------------------------------------------------
// Result computation
// ---------------------------------------------------------------------------

/// Produces raw, unredacted results for a course.
pub trait ResultCalculator {
    /// Raw sections for a course. Must be deterministic for a given snapshot.
    fn compute_results(&self, course: &Course) -> Vec<Section>;

    /// Grade distribution over all rating-bearing results of the course.
    fn average_distribution(&self, course: &Course) -> Option<Distribution>;

    /// Scalar grade for a distribution.
    fn distribution_to_grade(&self, distribution: Option<&Distribution>) -> Option<f64> {
        distribution::distribution_to_grade(distribution)
    }
}

// ---------------------------------------------------------------------------
// Entitlements
// ---------------------------------------------------------------------------

/// Per-course entitlement checks for a viewer.
pub trait CoursePolicy {
    fn can_user_see_course(&self, course: &Course, viewer: &Viewer) -> bool;

    fn can_user_see_grades(&self, course: &Course, viewer: &Viewer) -> bool;

    fn can_user_see_results_page(&self, course: &Course, viewer: &Viewer) -> bool;

    fn has_enough_voters_to_publish_grades(&self, course: &Course) -> bool;
}
