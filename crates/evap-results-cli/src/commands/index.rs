//! The `evap-results index` command.

use anyhow::Result;

use evap_results_core::policy::StandardPolicy;
use evap_results_core::ResultsEngine;

use crate::SourceArgs;

pub fn execute(source: &SourceArgs) -> Result<()> {
    let loaded = super::load(source)?;
    let policy = StandardPolicy::from_config(&loaded.config);
    let engine = ResultsEngine::new(&loaded.snapshot, &loaded.snapshot, &policy);

    let semesters = engine.index();

    if super::wants_json(source) {
        return super::print_json(&semesters);
    }

    if semesters.is_empty() {
        println!("No published results.");
        return Ok(());
    }
    for semester in &semesters {
        println!("{:>4}  {}", semester.id, semester.name);
    }
    Ok(())
}
