//! Central results orchestrator.
//!
//! Ties the data layer, the result calculator, and the entitlement policy
//! together to build the payloads of the results index, a semester page, and
//! a course page.

use serde::{Deserialize, Serialize};

use crate::distribution::DistributionSummary;
use crate::error::ResultsError;
use crate::grouping::{group_sections, GroupedSections};
use crate::headings::clean_sections;
use crate::index::{visible_states, CourseEntry, IndexedCourse, SemesterIndex};
use crate::model::{Course, CourseId, CourseState, Semester, SemesterId, Viewer};
use crate::redaction::{redact_results, redact_sections};
use crate::results::Section;
use crate::traits::{CoursePolicy, EvaluationStore, ResultCalculator};
use crate::visibility::ViewContext;

/// Decide whether a course page is rendered in public view.
///
/// `requested` is the raw `public_view` query value. Reviewers get the public
/// view unless it is explicitly `"false"`; everyone else only when it is
/// explicitly `"true"`. Without enough voters there is no public view.
pub fn resolve_public_view(
    viewer: &Viewer,
    requested: Option<&str>,
    has_enough_voters_to_publish_grades: bool,
) -> bool {
    let public_view = if viewer.is_reviewer {
        requested != Some("false")
    } else {
        requested == Some("true")
    };
    public_view && has_enough_voters_to_publish_grades
}

/// Everything the course results page displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    pub course: Course,
    pub summary: DistributionSummary,
    pub sections: GroupedSections,
    /// The viewer is a reviewer.
    pub reviewer: bool,
    /// The viewer contributes to the course or represents a contributor.
    pub contributor: bool,
    pub can_download_grades: bool,
    pub public_view: bool,
}

/// Redact, clean, and group raw sections for one viewer.
pub fn prepare_sections(sections: &[Section], ctx: &ViewContext<'_>) -> GroupedSections {
    let redacted = redact_sections(sections, ctx);
    let cleaned = clean_sections(redacted);
    tracing::debug!(
        course = %ctx.course.id,
        raw = sections.len(),
        kept = cleaned.len(),
        "prepared sections"
    );
    group_sections(cleaned, ctx.show_grades)
}

/// The results engine.
pub struct ResultsEngine<'a> {
    store: &'a dyn EvaluationStore,
    calculator: &'a dyn ResultCalculator,
    policy: &'a dyn CoursePolicy,
}

impl<'a> ResultsEngine<'a> {
    pub fn new(
        store: &'a dyn EvaluationStore,
        calculator: &'a dyn ResultCalculator,
        policy: &'a dyn CoursePolicy,
    ) -> Self {
        Self {
            store,
            calculator,
            policy,
        }
    }

    /// Results index: semesters with at least one published course.
    pub fn index(&self) -> Vec<Semester> {
        self.store
            .semesters()
            .into_iter()
            .filter(|s| {
                self.store
                    .courses_of(s.id)
                    .iter()
                    .any(|c| c.state == CourseState::Published)
            })
            .collect()
    }

    fn find_semester(&self, id: SemesterId) -> Result<Semester, ResultsError> {
        self.store
            .semester(id)
            .ok_or(ResultsError::SemesterNotFound(id))
    }

    /// Semester page: visible courses with their summaries, by degree.
    pub fn semester_detail(
        &self,
        viewer: &Viewer,
        semester_id: SemesterId,
    ) -> Result<SemesterIndex, ResultsError> {
        let semester = self.find_semester(semester_id)?;
        let states = visible_states(viewer);

        let courses: Vec<IndexedCourse> = self
            .store
            .courses_of(semester_id)
            .into_iter()
            .filter(|c| states.contains(&c.state))
            .filter(|c| self.policy.can_user_see_course(c, viewer))
            .map(|course| self.index_course(course, viewer))
            .collect();

        tracing::debug!(
            semester = %semester_id,
            visible = courses.len(),
            "assembling semester index"
        );

        Ok(SemesterIndex::assemble(semester, self.store.degrees(), courses))
    }

    fn index_course(&self, course: Course, viewer: &Viewer) -> IndexedCourse {
        let show_grades = self.policy.can_user_see_grades(&course, viewer);
        let summary = DistributionSummary::compute(&course, self.calculator, show_grades);

        if !course.is_single_result {
            return IndexedCourse::Normal(CourseEntry { course, summary });
        }

        let sections = self.calculator.compute_results(&course);
        let ctx = ViewContext::new(viewer, &course, false, show_grades);
        let result = match sections.first().and_then(|section| section.results.first()) {
            Some(raw) => redact_results(std::slice::from_ref(raw), &ctx).pop(),
            None => {
                tracing::warn!("single result course {} has no result", course.id);
                None
            }
        };

        IndexedCourse::SingleResult {
            entry: CourseEntry { course, summary },
            result,
        }
    }

    /// Course page: redacted, cleaned, and grouped sections.
    ///
    /// `public_view` is the raw query value, see [`resolve_public_view`].
    pub fn course_detail(
        &self,
        viewer: &Viewer,
        semester_id: SemesterId,
        course_id: CourseId,
        public_view: Option<&str>,
    ) -> Result<CourseDetail, ResultsError> {
        self.find_semester(semester_id)?;
        let course = self
            .store
            .course(semester_id, course_id)
            .ok_or(ResultsError::CourseNotFound {
                semester: semester_id,
                course: course_id,
            })?;

        if !self.policy.can_user_see_results_page(&course, viewer) {
            return Err(ResultsError::PermissionDenied(format!(
                "user {} may not view results of course {}",
                viewer.id, course.id
            )));
        }

        let public_view = resolve_public_view(
            viewer,
            public_view,
            self.policy.has_enough_voters_to_publish_grades(&course),
        );
        let show_grades = self.policy.can_user_see_grades(&course, viewer);

        let raw = self.calculator.compute_results(&course);
        let ctx = ViewContext::new(viewer, &course, public_view, show_grades);
        let sections = prepare_sections(&raw, &ctx);
        let summary = DistributionSummary::compute(&course, self.calculator, show_grades);

        Ok(CourseDetail {
            reviewer: viewer.is_reviewer,
            contributor: course.is_user_contributor_or_delegate(viewer),
            can_download_grades: viewer.can_download_grades,
            public_view,
            summary,
            sections,
            course,
        })
    }
}
