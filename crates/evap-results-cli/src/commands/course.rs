//! The `evap-results course` command.

use anyhow::Result;

use evap_results_core::engine::CourseDetail;
use evap_results_core::model::{CourseId, SemesterId, Viewer};
use evap_results_core::policy::StandardPolicy;
use evap_results_core::results::{QuestionResult, Section};
use evap_results_core::ResultsEngine;

use crate::SourceArgs;

pub fn execute(
    source: &SourceArgs,
    viewer: &Viewer,
    semester: SemesterId,
    course: CourseId,
    public_view: Option<&str>,
) -> Result<()> {
    let loaded = super::load(source)?;
    let policy = StandardPolicy::from_config(&loaded.config);
    let engine = ResultsEngine::new(&loaded.snapshot, &loaded.snapshot, &policy);

    let detail = engine.course_detail(viewer, semester, course, public_view)?;

    if super::wants_json(source) {
        return super::print_json(&detail);
    }
    print_detail(&detail);
    Ok(())
}

fn print_detail(detail: &CourseDetail) {
    let course = &detail.course;
    println!("{} ({}, {})", course.name, course.course_type, course.state);
    println!(
        "Voters: {}/{}  Average grade: {}",
        course.num_voters,
        course.num_participants,
        super::format_grade(detail.summary.avg_grade)
    );
    if detail.public_view {
        println!("Public view");
    }

    for section in &detail.sections.top {
        print_section(section);
    }
    for (contributor, bucket) in &detail.sections.contributors {
        println!("\nContributor {contributor} ({} votes)", bucket.total_votes);
        for section in &bucket.sections {
            print_section(section);
        }
    }
    for section in &detail.sections.bottom {
        print_section(section);
    }
}

fn print_section(section: &Section) {
    match &section.label {
        Some(label) => println!("\n[{}] {label}", section.questionnaire.name),
        None => println!("\n[{}]", section.questionnaire.name),
    }

    for result in &section.results {
        let text = &result.question().text;
        match result {
            QuestionResult::Heading(_) => println!("  ## {text}"),
            QuestionResult::Rating(r) => match r.average {
                Some(average) => println!("  {text}: {average:.2} ({} votes)", r.total_count),
                None => println!("  {text}: {} votes", r.total_count),
            },
            QuestionResult::YesNo(r) => match (r.average, r.approval_count) {
                (Some(average), Some(yes)) => println!(
                    "  {text}: {average:.2} ({yes} yes of {} votes)",
                    r.total_count
                ),
                _ => println!("  {text}: {} votes", r.total_count),
            },
            QuestionResult::Text(r) => {
                println!("  {text}:");
                for answer in &r.answers {
                    println!("    - {}", answer.text);
                }
            }
        }
    }
}
