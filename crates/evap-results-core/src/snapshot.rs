//! JSON snapshot of the data layer.
//!
//! A snapshot carries everything the pipeline reads: the degree catalog,
//! semesters, courses, and each course's raw sections and grade
//! distribution. It implements both [`EvaluationStore`] and
//! [`ResultCalculator`].

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;
use crate::model::{Course, CourseId, Degree, Semester, SemesterId};
use crate::results::Section;
use crate::traits::{EvaluationStore, ResultCalculator};

/// Raw results of one course as computed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResults {
    pub course: CourseId,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub distribution: Option<Distribution>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was taken.
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub degrees: Vec<Degree>,
    #[serde(default)]
    pub semesters: Vec<Semester>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub results: Vec<CourseResults>,
}

impl Snapshot {
    /// Save the snapshot as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize snapshot")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        Ok(())
    }

    /// Load a snapshot from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).context("failed to parse snapshot JSON")?;
        tracing::debug!(
            semesters = snapshot.semesters.len(),
            courses = snapshot.courses.len(),
            "loaded snapshot from {}",
            path.display()
        );
        Ok(snapshot)
    }

    fn course_results(&self, course: CourseId) -> Option<&CourseResults> {
        self.results.iter().find(|r| r.course == course)
    }
}

impl EvaluationStore for Snapshot {
    fn semesters(&self) -> Vec<Semester> {
        self.semesters.clone()
    }

    fn semester(&self, id: SemesterId) -> Option<Semester> {
        self.semesters.iter().find(|s| s.id == id).cloned()
    }

    fn course(&self, semester: SemesterId, course: CourseId) -> Option<Course> {
        self.courses
            .iter()
            .find(|c| c.id == course && c.semester == semester)
            .cloned()
    }

    fn courses_of(&self, semester: SemesterId) -> Vec<Course> {
        self.courses
            .iter()
            .filter(|c| c.semester == semester)
            .cloned()
            .collect()
    }

    fn degrees(&self) -> Vec<Degree> {
        let mut degrees = self.degrees.clone();
        degrees.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        degrees
    }
}

impl ResultCalculator for Snapshot {
    fn compute_results(&self, course: &Course) -> Vec<Section> {
        self.course_results(course.id)
            .map(|r| r.sections.clone())
            .unwrap_or_default()
    }

    fn average_distribution(&self, course: &Course) -> Option<Distribution> {
        self.course_results(course.id)
            .and_then(|r| r.distribution.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    fn course(id: u64, semester: u64, state: CourseState) -> Course {
        Course {
            id: CourseId(id),
            semester: SemesterId(semester),
            name: format!("course {id}"),
            course_type: "Seminar".into(),
            degrees: vec![],
            state,
            is_single_result: false,
            is_private: false,
            num_voters: 0,
            num_participants: 0,
            participants: vec![],
            contributions: vec![],
            num_text_answers: 0,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            exported_at: None,
            degrees: vec![
                Degree {
                    id: DegreeId(2),
                    name: "Master".into(),
                    order: 2,
                },
                Degree {
                    id: DegreeId(1),
                    name: "Bachelor".into(),
                    order: 1,
                },
            ],
            semesters: vec![
                Semester {
                    id: SemesterId(1),
                    name: "SS 23".into(),
                },
                Semester {
                    id: SemesterId(2),
                    name: "WS 23/24".into(),
                },
            ],
            courses: vec![
                course(1, 1, CourseState::Published),
                course(2, 2, CourseState::InEvaluation),
            ],
            results: vec![CourseResults {
                course: CourseId(1),
                sections: vec![],
                distribution: Some(Distribution(vec![1.0, 0.0, 0.0, 0.0, 0.0])),
            }],
        }
    }

    #[test]
    fn course_lookup_is_scoped_to_semester() {
        let s = snapshot();
        assert!(s.course(SemesterId(1), CourseId(1)).is_some());
        assert!(s.course(SemesterId(2), CourseId(1)).is_none());
        assert_eq!(s.courses_of(SemesterId(2)).len(), 1);
        assert!(s.semester(SemesterId(3)).is_none());
    }

    #[test]
    fn degrees_in_catalog_order() {
        let names: Vec<_> = snapshot().degrees().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Bachelor", "Master"]);
    }

    #[test]
    fn missing_results_are_empty() {
        let s = snapshot();
        let c = course(2, 2, CourseState::InEvaluation);
        assert!(s.compute_results(&c).is_empty());
        assert!(s.average_distribution(&c).is_none());
        assert_eq!(
            s.distribution_to_grade(s.average_distribution(&course(1, 1, CourseState::Published)).as_ref()),
            Some(1.0)
        );
    }

    #[test]
    fn json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        snapshot().save_json(&path).unwrap();
        let loaded = Snapshot::load_json(&path).unwrap();
        assert_eq!(loaded.courses.len(), 2);
        assert_eq!(loaded.results[0].course, CourseId(1));
    }
}
