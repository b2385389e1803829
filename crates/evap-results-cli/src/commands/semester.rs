//! The `evap-results semester` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use evap_results_core::distribution::DistributionSummary;
use evap_results_core::index::SemesterIndex;
use evap_results_core::model::{Course, SemesterId, Viewer};
use evap_results_core::policy::StandardPolicy;
use evap_results_core::ResultsEngine;

use crate::SourceArgs;

pub fn execute(source: &SourceArgs, viewer: &Viewer, semester: SemesterId) -> Result<()> {
    let loaded = super::load(source)?;
    let policy = StandardPolicy::from_config(&loaded.config);
    let engine = ResultsEngine::new(&loaded.snapshot, &loaded.snapshot, &policy);

    let index = engine.semester_detail(viewer, semester)?;

    if super::wants_json(source) {
        return super::print_json(&index);
    }
    print_index(&index);
    Ok(())
}

fn entry_row(course: &Course, summary: &DistributionSummary, kind: &str) -> Vec<Cell> {
    vec![
        Cell::new(&course.name),
        Cell::new(&course.course_type),
        Cell::new(kind),
        Cell::new(course.state),
        Cell::new(course.num_voters),
        Cell::new(course.num_participants),
        Cell::new(super::format_grade(summary.avg_grade)),
    ]
}

fn print_index(index: &SemesterIndex) {
    println!("Semester: {}", index.semester.name);

    if index.entry_count() == 0 {
        println!("No visible courses.");
        return;
    }

    for bucket in index.degrees.values() {
        if bucket.courses.is_empty() && bucket.single_results.is_empty() {
            continue;
        }

        let mut table = Table::new();
        table.set_header(vec![
            "Name",
            "Type",
            "Kind",
            "State",
            "#Voters",
            "#Participants",
            "Avg grade",
        ]);
        for entry in &bucket.courses {
            table.add_row(entry_row(&entry.course, &entry.summary, "course"));
        }
        for single in &bucket.single_results {
            table.add_row(entry_row(&single.course, &single.summary, "single result"));
        }

        println!("\n{}", bucket.degree.name);
        println!("{table}");
    }
}
