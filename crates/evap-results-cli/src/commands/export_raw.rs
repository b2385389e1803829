//! The `evap-results export-raw` command.

use std::path::PathBuf;

use anyhow::Result;

use evap_results_core::model::{SemesterId, Viewer};
use evap_results_export::raw::semester_raw_export;

use crate::SourceArgs;

pub fn execute(
    source: &SourceArgs,
    viewer: &Viewer,
    semester: SemesterId,
    output: Option<PathBuf>,
) -> Result<()> {
    let loaded = super::load(source)?;
    let file = semester_raw_export(
        &loaded.snapshot,
        &loaded.snapshot,
        viewer,
        semester,
        &loaded.config.language,
    )?;

    let dir = output.unwrap_or(loaded.config.output_dir);
    let path = file.write_to(&dir)?;
    println!("Wrote {}", path.display());
    Ok(())
}
