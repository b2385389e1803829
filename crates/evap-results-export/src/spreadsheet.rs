//! Spreadsheet export driven by a course-type selection form.
//!
//! The form has one row per output sheet, each selecting a set of course
//! types, plus two toggles. Invalid input never raises: it comes back as
//! [`SelectionErrors`] so the caller can show the form again.

use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use evap_results_core::model::{Course, CourseState, Semester, SemesterId, Viewer};
use evap_results_core::traits::{CoursePolicy, EvaluationStore, ResultCalculator};
use evap_results_core::ResultsError;

use crate::error::ExportError;
use crate::file::ExportFile;

pub const SPREADSHEET_CONTENT_TYPE: &str = "application/vnd.ms-excel";

/// One row of the selection form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetForm {
    #[serde(default)]
    pub selected_course_types: Vec<String>,
    /// Rows marked for deletion are ignored.
    #[serde(default)]
    pub delete: bool,
}

impl SheetForm {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_course_types: types.into_iter().map(Into::into).collect(),
            delete: false,
        }
    }
}

/// The submitted form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSelection {
    #[serde(default)]
    pub sheets: Vec<SheetForm>,
    #[serde(default)]
    pub include_not_enough_answers: bool,
    #[serde(default)]
    pub include_unpublished: bool,
}

/// Field-level validation errors of a rejected selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionErrors {
    pub non_form_errors: Vec<String>,
    /// Errors keyed by the position of the row in the submitted form.
    pub row_errors: Vec<(usize, Vec<String>)>,
}

impl SelectionErrors {
    pub fn is_empty(&self) -> bool {
        self.non_form_errors.is_empty() && self.row_errors.is_empty()
    }
}

impl fmt::Display for SelectionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.non_form_errors {
            writeln!(f, "{error}")?;
        }
        for (row, errors) in &self.row_errors {
            for error in errors {
                writeln!(f, "sheet {}: {error}", row + 1)?;
            }
        }
        Ok(())
    }
}

/// Validated request handed to a [`SpreadsheetExporter`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetRequest {
    /// Course types per sheet, in form order.
    pub course_types_list: Vec<Vec<String>>,
    pub include_not_enough_answers: bool,
    pub include_unpublished: bool,
}

impl ExportSelection {
    /// Check the selection against the course types present in a semester.
    pub fn validate(
        &self,
        available_types: &BTreeSet<String>,
    ) -> Result<SpreadsheetRequest, SelectionErrors> {
        let mut errors = SelectionErrors::default();
        let mut course_types_list = Vec::new();

        for (row, sheet) in self.sheets.iter().enumerate() {
            if sheet.delete {
                continue;
            }
            let mut row_errors = Vec::new();
            if sheet.selected_course_types.is_empty() {
                row_errors.push("This field is required.".to_string());
            }
            for course_type in &sheet.selected_course_types {
                if !available_types.contains(course_type) {
                    row_errors.push(format!(
                        "Select a valid choice. {course_type} is not one of the available choices."
                    ));
                }
            }
            if row_errors.is_empty() {
                course_types_list.push(sheet.selected_course_types.clone());
            } else {
                errors.row_errors.push((row, row_errors));
            }
        }

        if self.sheets.iter().all(|s| s.delete) {
            errors
                .non_form_errors
                .push("Please submit at least 1 form.".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SpreadsheetRequest {
            course_types_list,
            include_not_enough_answers: self.include_not_enough_answers,
            include_unpublished: self.include_unpublished,
        })
    }
}

/// Distinct course types of a semester's courses.
pub fn available_course_types(courses: &[Course]) -> BTreeSet<String> {
    courses.iter().map(|c| c.course_type.clone()).collect()
}

/// Serializes a semester's results into a spreadsheet.
pub trait SpreadsheetExporter {
    fn export(
        &self,
        semester: &Semester,
        request: &SpreadsheetRequest,
        out: &mut dyn Write,
    ) -> anyhow::Result<()>;
}

/// Writes every sheet as a `# <types>` line followed by a semicolon CSV block.
///
/// The output is plain text standing in for a binary spreadsheet, even though
/// [`semester_export`] names it `.xls`. A real workbook writer is another
/// [`SpreadsheetExporter`].
pub struct DelimitedSheetExporter<'a> {
    store: &'a dyn EvaluationStore,
    calculator: &'a dyn ResultCalculator,
    policy: &'a dyn CoursePolicy,
}

impl<'a> DelimitedSheetExporter<'a> {
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

    fn included(&self, course: &Course, types: &[String], request: &SpreadsheetRequest) -> bool {
        if !types.contains(&course.course_type) {
            return false;
        }
        if !request.include_unpublished && course.state != CourseState::Published {
            return false;
        }
        request.include_not_enough_answers
            || self.policy.has_enough_voters_to_publish_grades(course)
    }
}

impl SpreadsheetExporter for DelimitedSheetExporter<'_> {
    fn export(
        &self,
        semester: &Semester,
        request: &SpreadsheetRequest,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let courses = self.store.courses_of(semester.id);

        for types in &request.course_types_list {
            writeln!(out, "# {}", types.join(", "))?;
            let mut csv = csv::WriterBuilder::new()
                .delimiter(b';')
                .terminator(csv::Terminator::CRLF)
                .from_writer(&mut *out);
            csv.write_record([
                "Name",
                "Type",
                "State",
                "#Voters",
                "#Participants",
                "Average grade",
            ])?;

            for course in courses.iter().filter(|c| self.included(c, types, request)) {
                let grade = if course.state.has_finished_evaluation() {
                    self.calculator.distribution_to_grade(
                        self.calculator.average_distribution(course).as_ref(),
                    )
                } else {
                    None
                };
                csv.write_record([
                    course.name.clone(),
                    course.course_type.clone(),
                    course.state.to_string(),
                    course.num_voters.to_string(),
                    course.num_participants.to_string(),
                    grade.map(|g| format!("{g:.1}")).unwrap_or_default(),
                ])?;
            }
            csv.flush().context("failed to flush sheet")?;
        }
        Ok(())
    }
}

/// Result of a spreadsheet export request.
#[derive(Debug)]
pub enum SpreadsheetOutcome {
    File(ExportFile),
    /// The selection was rejected; show the form again with these errors.
    Invalid(SelectionErrors),
}

pub fn spreadsheet_filename(semester_name: &str, language: &str) -> String {
    format!("Evaluation-{semester_name}-{language}.xls")
}

/// Staff-only spreadsheet export of a semester.
pub fn semester_export(
    store: &dyn EvaluationStore,
    exporter: &dyn SpreadsheetExporter,
    viewer: &Viewer,
    semester_id: SemesterId,
    language: &str,
    selection: &ExportSelection,
) -> Result<SpreadsheetOutcome, ExportError> {
    if !viewer.is_staff {
        return Err(ResultsError::PermissionDenied(format!(
            "user {} may not export semester {}",
            viewer.id, semester_id
        ))
        .into());
    }

    let semester = store
        .semester(semester_id)
        .ok_or(ResultsError::SemesterNotFound(semester_id))?;

    let available = available_course_types(&store.courses_of(semester_id));
    let request = match selection.validate(&available) {
        Ok(request) => request,
        Err(errors) => {
            tracing::debug!(semester = %semester_id, "export selection rejected");
            return Ok(SpreadsheetOutcome::Invalid(errors));
        }
    };

    let mut body = Vec::new();
    exporter
        .export(&semester, &request, &mut body)
        .map_err(ExportError::Exporter)?;
    tracing::info!(
        semester = %semester_id,
        sheets = request.course_types_list.len(),
        "spreadsheet export assembled"
    );

    Ok(SpreadsheetOutcome::File(ExportFile {
        filename: spreadsheet_filename(&semester.name, language),
        content_type: SPREADSHEET_CONTENT_TYPE,
        body,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evap_results_core::distribution::Distribution;
    use evap_results_core::model::*;
    use evap_results_core::policy::StandardPolicy;
    use evap_results_core::snapshot::{CourseResults, Snapshot};

    fn course(id: u64, course_type: &str, state: CourseState, voters: u32) -> Course {
        Course {
            id: CourseId(id),
            semester: SemesterId(1),
            name: format!("course {id}"),
            course_type: course_type.into(),
            degrees: vec![],
            state,
            is_single_result: false,
            is_private: false,
            num_voters: voters,
            num_participants: 10,
            participants: vec![],
            contributions: vec![],
            num_text_answers: 0,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            exported_at: None,
            degrees: vec![],
            semesters: vec![Semester {
                id: SemesterId(1),
                name: "SS 24".into(),
            }],
            courses: vec![
                course(1, "Lecture", CourseState::Published, 5),
                course(2, "Seminar", CourseState::Published, 4),
                course(3, "Lecture", CourseState::Reviewed, 6),
                course(4, "Lecture", CourseState::Published, 1),
            ],
            results: vec![CourseResults {
                course: CourseId(1),
                sections: vec![],
                distribution: Some(Distribution(vec![0.5, 0.5, 0.0, 0.0, 0.0])),
            }],
        }
    }

    fn staff() -> Viewer {
        let mut v = Viewer::new(UserId(1));
        v.is_staff = true;
        v
    }

    fn types() -> BTreeSet<String> {
        ["Lecture".to_string(), "Seminar".to_string()].into()
    }

    #[test]
    fn valid_selection_skips_deleted_rows() {
        let selection = ExportSelection {
            sheets: vec![
                SheetForm::new(["Lecture"]),
                SheetForm {
                    selected_course_types: vec!["Bogus".into()],
                    delete: true,
                },
                SheetForm::new(["Lecture", "Seminar"]),
            ],
            include_not_enough_answers: true,
            include_unpublished: false,
        };
        let request = selection.validate(&types()).unwrap();
        assert_eq!(
            request.course_types_list,
            vec![
                vec!["Lecture".to_string()],
                vec!["Lecture".to_string(), "Seminar".to_string()]
            ]
        );
        assert!(request.include_not_enough_answers);
    }

    #[test]
    fn selection_from_submitted_json() {
        let selection: ExportSelection = serde_json::from_str(
            r#"{
                "sheets": [
                    {"selected_course_types": ["Seminar"]},
                    {"selected_course_types": [], "delete": true}
                ],
                "include_unpublished": true
            }"#,
        )
        .unwrap();
        assert!(selection.include_unpublished);
        assert!(!selection.include_not_enough_answers);
        let request = selection.validate(&types()).unwrap();
        assert_eq!(request.course_types_list, vec![vec!["Seminar".to_string()]]);
    }

    #[test]
    fn at_least_one_row_required() {
        let errors = ExportSelection::default().validate(&types()).unwrap_err();
        assert_eq!(errors.non_form_errors, vec!["Please submit at least 1 form."]);

        let only_deleted = ExportSelection {
            sheets: vec![SheetForm {
                selected_course_types: vec!["Lecture".into()],
                delete: true,
            }],
            ..Default::default()
        };
        assert!(!only_deleted.validate(&types()).unwrap_err().non_form_errors.is_empty());
    }

    #[test]
    fn row_errors_carry_positions() {
        let selection = ExportSelection {
            sheets: vec![
                SheetForm::new(["Lecture"]),
                SheetForm::default(),
                SheetForm::new(["Tutorial"]),
            ],
            ..Default::default()
        };
        let errors = selection.validate(&types()).unwrap_err();
        assert!(errors.non_form_errors.is_empty());
        assert_eq!(errors.row_errors.len(), 2);
        assert_eq!(errors.row_errors[0], (1, vec!["This field is required.".to_string()]));
        assert_eq!(errors.row_errors[1].0, 2);
        assert!(errors.row_errors[1].1[0].contains("Tutorial is not one of the available choices"));
        assert!(errors.to_string().contains("sheet 2: This field is required."));
    }

    #[test]
    fn delimited_exporter_filters_courses() {
        let snap = snapshot();
        let policy = StandardPolicy::default();
        let exporter = DelimitedSheetExporter::new(&snap, &snap, &policy);
        let request = SpreadsheetRequest {
            course_types_list: vec![vec!["Lecture".into()]],
            include_not_enough_answers: false,
            include_unpublished: false,
        };
        let mut out = Vec::new();
        exporter
            .export(&snap.semesters[0], &request, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# Lecture\n"));
        assert!(text.contains("course 1;Lecture;published;5;10;1.5\r\n"));
        assert!(!text.contains("course 2"));
        assert!(!text.contains("course 3"));
        assert!(!text.contains("course 4"));

        let everything = SpreadsheetRequest {
            include_not_enough_answers: true,
            include_unpublished: true,
            ..request
        };
        let mut out = Vec::new();
        exporter
            .export(&snap.semesters[0], &everything, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("course 3;Lecture;reviewed;6;10;\r\n"));
        assert!(text.contains("course 4;Lecture;published;1;10;\r\n"));
    }

    #[test]
    fn export_produces_file() {
        let snap = snapshot();
        let policy = StandardPolicy::default();
        let exporter = DelimitedSheetExporter::new(&snap, &snap, &policy);
        let selection = ExportSelection {
            sheets: vec![SheetForm::new(["Lecture"]), SheetForm::new(["Seminar"])],
            ..Default::default()
        };
        let outcome =
            semester_export(&snap, &exporter, &staff(), SemesterId(1), "de", &selection).unwrap();
        let SpreadsheetOutcome::File(file) = outcome else {
            panic!("expected a file");
        };
        assert_eq!(file.filename, "Evaluation-SS 24-de.xls");
        assert_eq!(file.content_type, SPREADSHEET_CONTENT_TYPE);
        let text = String::from_utf8(file.body).unwrap();
        assert!(text.contains("# Seminar\n"));
        assert!(text.contains("course 2;Seminar;published;4;10;"));
    }

    #[test]
    fn delimited_sheets_are_plain_text() {
        let snap = snapshot();
        let policy = StandardPolicy::default();
        let exporter = DelimitedSheetExporter::new(&snap, &snap, &policy);
        let request = SpreadsheetRequest {
            course_types_list: vec![vec!["Lecture".into()], vec!["Seminar".into()]],
            include_not_enough_answers: false,
            include_unpublished: false,
        };
        let mut out = Vec::new();
        exporter
            .export(&snap.semesters[0], &request, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let sheet_lines: Vec<_> = text.lines().filter(|l| l.starts_with("# ")).collect();
        assert_eq!(sheet_lines, vec!["# Lecture", "# Seminar"]);
    }

    #[test]
    fn invalid_selection_returns_form_errors() {
        let snap = snapshot();
        let policy = StandardPolicy::default();
        let exporter = DelimitedSheetExporter::new(&snap, &snap, &policy);
        let selection = ExportSelection {
            sheets: vec![SheetForm::new(["Tutorial"])],
            ..Default::default()
        };
        let outcome =
            semester_export(&snap, &exporter, &staff(), SemesterId(1), "en", &selection).unwrap();
        assert!(matches!(outcome, SpreadsheetOutcome::Invalid(e) if e.row_errors.len() == 1));
    }

    #[test]
    fn export_requires_staff() {
        let snap = snapshot();
        let policy = StandardPolicy::default();
        let exporter = DelimitedSheetExporter::new(&snap, &snap, &policy);
        let err = semester_export(
            &snap,
            &exporter,
            &Viewer::new(UserId(3)),
            SemesterId(1),
            "en",
            &ExportSelection::default(),
        )
        .unwrap_err();
        assert!(err.is_permission_denied());
    }

    struct FailingExporter;

    impl SpreadsheetExporter for FailingExporter {
        fn export(&self, _: &Semester, _: &SpreadsheetRequest, _: &mut dyn Write) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn exporter_failure_is_reported() {
        let snap = snapshot();
        let selection = ExportSelection {
            sheets: vec![SheetForm::new(["Lecture"])],
            ..Default::default()
        };
        let err = semester_export(&snap, &FailingExporter, &staff(), SemesterId(1), "en", &selection)
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
