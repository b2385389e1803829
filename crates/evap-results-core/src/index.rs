//! Semester overview: visible courses bucketed by degree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::distribution::DistributionSummary;
use crate::model::{Course, CourseState, Degree, DegreeId, Semester, Viewer};
use crate::results::QuestionResult;

/// Course states listed on a semester page for `viewer`.
pub fn visible_states(viewer: &Viewer) -> Vec<CourseState> {
    let mut states = vec![CourseState::Published];
    if viewer.is_reviewer {
        states.extend([
            CourseState::InEvaluation,
            CourseState::Evaluated,
            CourseState::Reviewed,
        ]);
    }
    states
}

/// A course with its distribution summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEntry {
    pub course: Course,
    pub summary: DistributionSummary,
}

/// A single-result course with the one result it carries.
///
/// `result` is `None` when nothing of it is left for the viewer; the course
/// is listed regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleResultEntry {
    pub course: Course,
    pub summary: DistributionSummary,
    pub result: Option<QuestionResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeCourses {
    pub degree: Degree,
    pub courses: Vec<CourseEntry>,
    pub single_results: Vec<SingleResultEntry>,
}

/// Courses of a semester grouped by degree, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterIndex {
    pub semester: Semester,
    pub degrees: IndexMap<DegreeId, DegreeCourses>,
}

/// A visible course ready to be placed into the index.
#[derive(Debug, Clone)]
pub enum IndexedCourse {
    Normal(CourseEntry),
    /// `result` is the viewer's redacted view of the first result.
    SingleResult {
        entry: CourseEntry,
        result: Option<QuestionResult>,
    },
}

impl IndexedCourse {
    fn course(&self) -> &Course {
        match self {
            IndexedCourse::Normal(entry) => &entry.course,
            IndexedCourse::SingleResult { entry, .. } => &entry.course,
        }
    }
}

impl SemesterIndex {
    /// Bucket courses under every degree they belong to.
    ///
    /// Every catalog degree gets a bucket, even an empty one. Degrees a
    /// course references but the catalog lacks are skipped.
    pub fn assemble(semester: Semester, catalog: Vec<Degree>, courses: Vec<IndexedCourse>) -> Self {
        let mut degrees: IndexMap<DegreeId, DegreeCourses> = catalog
            .into_iter()
            .map(|degree| {
                (
                    degree.id,
                    DegreeCourses {
                        degree,
                        courses: Vec::new(),
                        single_results: Vec::new(),
                    },
                )
            })
            .collect();

        for indexed in courses {
            for degree_id in &indexed.course().degrees {
                let Some(bucket) = degrees.get_mut(degree_id) else {
                    tracing::warn!(
                        "course {} references unknown degree {}",
                        indexed.course().id,
                        degree_id
                    );
                    continue;
                };
                match &indexed {
                    IndexedCourse::Normal(entry) => bucket.courses.push(entry.clone()),
                    IndexedCourse::SingleResult { entry, result } => {
                        bucket.single_results.push(SingleResultEntry {
                            course: entry.course.clone(),
                            summary: entry.summary.clone(),
                            result: result.clone(),
                        })
                    }
                }
            }
        }

        Self { semester, degrees }
    }

    /// Number of course appearances across all degrees.
    pub fn entry_count(&self) -> usize {
        self.degrees
            .values()
            .map(|d| d.courses.len() + d.single_results.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::results::*;

    fn degree(id: u64, name: &str) -> Degree {
        Degree {
            id: DegreeId(id),
            name: name.into(),
            order: id as u32,
        }
    }

    fn course(id: u64, degrees: &[u64]) -> Course {
        Course {
            id: CourseId(id),
            semester: SemesterId(1),
            name: format!("course {id}"),
            course_type: "Lecture".into(),
            degrees: degrees.iter().copied().map(DegreeId).collect(),
            state: CourseState::Published,
            is_single_result: false,
            is_private: false,
            num_voters: 5,
            num_participants: 10,
            participants: vec![],
            contributions: vec![],
            num_text_answers: 0,
        }
    }

    fn entry(course: Course) -> CourseEntry {
        CourseEntry {
            course,
            summary: DistributionSummary::default(),
        }
    }

    fn semester() -> Semester {
        Semester {
            id: SemesterId(1),
            name: "WS 23/24".into(),
        }
    }

    #[test]
    fn reviewers_see_more_states() {
        assert_eq!(visible_states(&Viewer::new(UserId(1))), vec![CourseState::Published]);
        let mut reviewer = Viewer::new(UserId(2));
        reviewer.is_reviewer = true;
        let states = visible_states(&reviewer);
        assert_eq!(states.len(), 4);
        assert!(states.contains(&CourseState::InEvaluation));
        assert!(!states.contains(&CourseState::Approved));
    }

    #[test]
    fn course_appears_under_each_degree() {
        let index = SemesterIndex::assemble(
            semester(),
            vec![degree(1, "Bachelor"), degree(2, "Master"), degree(3, "Other")],
            vec![
                IndexedCourse::Normal(entry(course(10, &[2, 1]))),
                IndexedCourse::Normal(entry(course(11, &[2]))),
            ],
        );

        let order: Vec<_> = index.degrees.keys().map(|d| d.0).collect();
        assert_eq!(order, vec![1, 2, 3]);

        let master: Vec<_> = index.degrees[&DegreeId(2)]
            .courses
            .iter()
            .map(|e| e.course.id.0)
            .collect();
        assert_eq!(master, vec![10, 11]);
        assert_eq!(index.degrees[&DegreeId(1)].courses.len(), 1);
        assert!(index.degrees[&DegreeId(3)].courses.is_empty());
        assert_eq!(index.entry_count(), 3);
    }

    #[test]
    fn single_results_are_bucketed_separately() {
        let result = QuestionResult::Rating(RatingResult {
            question: Question {
                id: QuestionId(1),
                text: "Grade".into(),
                kind: QuestionKind::Rating,
            },
            total_count: 8,
            average: None,
            counts: None,
            warning: false,
        });
        let mut single = course(20, &[1]);
        single.is_single_result = true;

        let index = SemesterIndex::assemble(
            semester(),
            vec![degree(1, "Bachelor")],
            vec![
                IndexedCourse::SingleResult {
                    entry: entry(single.clone()),
                    result: Some(result.clone()),
                },
                IndexedCourse::SingleResult {
                    entry: entry(single),
                    result: None,
                },
            ],
        );
        let bucket = &index.degrees[&DegreeId(1)];
        assert!(bucket.courses.is_empty());
        assert_eq!(bucket.single_results.len(), 2);
        assert_eq!(bucket.single_results[0].result, Some(result));
        assert_eq!(bucket.single_results[1].result, None);
        assert_eq!(index.entry_count(), 2);
    }

    #[test]
    fn unknown_degrees_are_skipped() {
        let index = SemesterIndex::assemble(
            semester(),
            vec![degree(1, "Bachelor")],
            vec![IndexedCourse::Normal(entry(course(10, &[1, 7])))],
        );
        assert_eq!(index.degrees.len(), 1);
        assert_eq!(index.entry_count(), 1);
    }
}
