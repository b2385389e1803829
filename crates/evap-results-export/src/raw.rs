//! Raw CSV export: one row per course of a semester.
//!
//! Unfiltered by result visibility, so only staff may run it.

use std::collections::HashMap;
use std::io::Write;

use evap_results_core::model::{Course, DegreeId, SemesterId, Viewer};
use evap_results_core::traits::{EvaluationStore, ResultCalculator};
use evap_results_core::ResultsError;

use crate::error::ExportError;
use crate::file::ExportFile;

/// Column headers for `language`, English unless German is requested.
pub fn header(language: &str) -> [&'static str; 9] {
    match language {
        "de" => [
            "Name",
            "Studiengänge",
            "Typ",
            "Einzelergebnis",
            "Status",
            "#Abstimmende",
            "#Teilnehmende",
            "#Kommentare",
            "Durchschnittsnote",
        ],
        _ => [
            "Name",
            "Degrees",
            "Type",
            "Single result",
            "State",
            "#Voters",
            "#Participants",
            "#Comments",
            "Average grade",
        ],
    }
}

/// One exported course.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExportRow {
    pub name: String,
    pub degrees: String,
    pub course_type: String,
    pub is_single_result: bool,
    pub state: String,
    pub num_voters: u32,
    pub num_participants: u32,
    pub num_comments: u32,
    pub avg_grade: Option<f64>,
}

impl RawExportRow {
    fn record(&self) -> [String; 9] {
        [
            self.name.clone(),
            self.degrees.clone(),
            self.course_type.clone(),
            if self.is_single_result { "True" } else { "False" }.to_string(),
            self.state.clone(),
            self.num_voters.to_string(),
            self.num_participants.to_string(),
            self.num_comments.to_string(),
            self.avg_grade
                .map(|grade| format!("{grade:.1}"))
                .unwrap_or_default(),
        ]
    }
}

fn build_row(
    course: &Course,
    degree_names: &HashMap<DegreeId, String>,
    calculator: &dyn ResultCalculator,
) -> RawExportRow {
    let degrees = course
        .degrees
        .iter()
        .filter_map(|id| degree_names.get(id).map(String::as_str))
        .collect::<Vec<_>>()
        .join(", ");

    let avg_grade = if course.state.has_finished_evaluation() {
        calculator.distribution_to_grade(calculator.average_distribution(course).as_ref())
    } else {
        None
    };

    RawExportRow {
        name: course.name.clone(),
        degrees,
        course_type: course.course_type.clone(),
        is_single_result: course.is_single_result,
        state: course.state.to_string(),
        num_voters: course.num_voters,
        num_participants: course.num_participants,
        num_comments: course.num_text_answers,
        avg_grade,
    }
}

/// Rows for every course of the semester, in data-layer order.
pub fn raw_rows(
    store: &dyn EvaluationStore,
    calculator: &dyn ResultCalculator,
    semester_id: SemesterId,
) -> Result<Vec<RawExportRow>, ResultsError> {
    store
        .semester(semester_id)
        .ok_or(ResultsError::SemesterNotFound(semester_id))?;

    let degree_names: HashMap<DegreeId, String> = store
        .degrees()
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();

    Ok(store
        .courses_of(semester_id)
        .iter()
        .map(|course| build_row(course, &degree_names, calculator))
        .collect())
}

/// Write rows as semicolon-delimited CSV with a localized header.
pub fn write_raw_csv<W: Write>(
    rows: &[RawExportRow],
    language: &str,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    csv.write_record(header(language))?;
    for row in rows {
        csv.write_record(row.record())?;
    }
    csv.flush()?;
    Ok(())
}

/// Filename of the raw export for a semester.
pub fn raw_export_filename(semester_name: &str, language: &str) -> String {
    format!("Evaluation-{semester_name}-{language}_raw.csv")
}

/// Staff-only raw CSV export of a semester.
pub fn semester_raw_export(
    store: &dyn EvaluationStore,
    calculator: &dyn ResultCalculator,
    viewer: &Viewer,
    semester_id: SemesterId,
    language: &str,
) -> Result<ExportFile, ExportError> {
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
    let rows = raw_rows(store, calculator, semester_id)?;

    let mut body = Vec::new();
    write_raw_csv(&rows, language, &mut body)?;
    tracing::info!(semester = %semester_id, rows = rows.len(), "raw export assembled");

    Ok(ExportFile {
        filename: raw_export_filename(&semester.name, language),
        content_type: "text/csv",
        body,
    })
}
