pub mod course;
pub mod export;
pub mod export_raw;
pub mod index;
pub mod init;
pub mod semester;

use anyhow::Result;
use serde::Serialize;

use evap_results_core::config::{load_config_from, ResultsConfig};
use evap_results_core::snapshot::Snapshot;

use crate::SourceArgs;

/// Snapshot and config shared by every data command.
pub struct Loaded {
    pub snapshot: Snapshot,
    pub config: ResultsConfig,
}

pub fn load(source: &SourceArgs) -> Result<Loaded> {
    let config = load_config_from(source.config.as_deref())?;
    let snapshot = Snapshot::load_json(&source.snapshot)?;
    Ok(Loaded { snapshot, config })
}

pub fn wants_json(source: &SourceArgs) -> bool {
    source.format == "json"
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn format_grade(grade: Option<f64>) -> String {
    grade.map(|g| format!("{g:.1}")).unwrap_or_else(|| "-".to_string())
}
