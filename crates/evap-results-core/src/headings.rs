//! Removal of headings that no longer introduce any question.

use crate::results::{QuestionResult, Section};

/// Drop headings that are last or directly followed by another heading.
///
/// Single pass: look-ahead inspects the input list, not the filtered one.
/// In a run of headings only the last survives, and only if a question
/// follows it.
pub fn drop_dangling_headings(results: Vec<QuestionResult>) -> Vec<QuestionResult> {
    let keep: Vec<bool> = results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            !result.is_heading()
                || results
                    .get(index + 1)
                    .is_some_and(|next| !next.is_heading())
        })
        .collect();

    results
        .into_iter()
        .zip(keep)
        .filter_map(|(result, keep)| keep.then_some(result))
        .collect()
}

/// Clean up headings in every section and drop sections left empty.
pub fn clean_sections(sections: Vec<Section>) -> Vec<Section> {
    sections
        .into_iter()
        .map(|section| {
            let results = drop_dangling_headings(section.results);
            Section { results, ..section }
        })
        .filter(|section| !section.is_empty())
        .collect()
}
