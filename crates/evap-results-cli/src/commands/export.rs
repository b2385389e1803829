//! The `evap-results export` command.

use std::path::PathBuf;

use anyhow::Result;

use evap_results_core::model::{SemesterId, Viewer};
use evap_results_core::policy::StandardPolicy;
use evap_results_export::spreadsheet::{
    semester_export, DelimitedSheetExporter, ExportSelection, SheetForm, SpreadsheetOutcome,
};

use crate::SourceArgs;

/// Build the selection form from `--sheet` values.
///
/// Each value is one sheet; its comma-separated entries are course types.
pub fn selection_from_args(
    sheets: &[String],
    include_not_enough_answers: bool,
    include_unpublished: bool,
) -> ExportSelection {
    ExportSelection {
        sheets: sheets
            .iter()
            .map(|sheet| {
                SheetForm::new(
                    sheet
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty()),
                )
            })
            .collect(),
        include_not_enough_answers,
        include_unpublished,
    }
}

pub fn execute(
    source: &SourceArgs,
    viewer: &Viewer,
    semester: SemesterId,
    selection: ExportSelection,
    output: Option<PathBuf>,
) -> Result<()> {
    let loaded = super::load(source)?;
    let policy = StandardPolicy::from_config(&loaded.config);
    let exporter = DelimitedSheetExporter::new(&loaded.snapshot, &loaded.snapshot, &policy);

    let outcome = semester_export(
        &loaded.snapshot,
        &exporter,
        viewer,
        semester,
        &loaded.config.language,
        &selection,
    )?;

    match outcome {
        SpreadsheetOutcome::File(file) => {
            let dir = output.unwrap_or(loaded.config.output_dir);
            let path = file.write_to(&dir)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        SpreadsheetOutcome::Invalid(errors) => {
            eprint!("{errors}");
            anyhow::bail!("invalid sheet selection, no file written")
        }
    }
}
