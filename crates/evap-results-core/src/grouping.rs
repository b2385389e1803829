//! Partitioning of cleaned sections for display.
//!
//! Course-level sections go above or below the contributors depending on
//! their questionnaire; contributor sections are bucketed by contributor in
//! first-seen order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::UserId;
use crate::results::{QuestionResult, Section};

/// Sections of one contributor plus their vote tally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributorSections {
    pub total_votes: u64,
    pub sections: Vec<Section>,
}

/// Sections partitioned for the results page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedSections {
    pub top: Vec<Section>,
    pub bottom: Vec<Section>,
    pub contributors: IndexMap<UserId, ContributorSections>,
}

impl GroupedSections {
    /// Total number of sections across all buckets.
    pub fn section_count(&self) -> usize {
        self.top.len()
            + self.bottom.len()
            + self
                .contributors
                .values()
                .map(|c| c.sections.len())
                .sum::<usize>()
    }
}

/// Votes a section adds to its contributor's tally.
///
/// One per text result; rating and yes/no results add their vote count, but
/// only when grades are shown.
pub fn section_votes(section: &Section, show_grades: bool) -> u64 {
    section
        .results
        .iter()
        .map(|result| match result {
            QuestionResult::Text(_) => 1,
            QuestionResult::Rating(_) | QuestionResult::YesNo(_) if show_grades => {
                u64::from(result.total_count().unwrap_or(0))
            }
            QuestionResult::Rating(_) | QuestionResult::YesNo(_) | QuestionResult::Heading(_) => 0,
        })
        .sum()
}

/// Partition sections into top, bottom, and per-contributor buckets.
pub fn group_sections(sections: Vec<Section>, show_grades: bool) -> GroupedSections {
    let mut grouped = GroupedSections::default();

    for section in sections {
        match section.contributor {
            None if section.questionnaire.is_below_contributors => grouped.bottom.push(section),
            None => grouped.top.push(section),
            Some(contributor) => {
                let votes = section_votes(&section, show_grades);
                let bucket = grouped.contributors.entry(contributor).or_default();
                bucket.total_votes += votes;
                bucket.sections.push(section);
            }
        }
    }

    tracing::debug!(
        top = grouped.top.len(),
        bottom = grouped.bottom.len(),
        contributors = grouped.contributors.len(),
        "grouped sections"
    );

    grouped
}
