//! Removal of everything a viewer may not see from raw sections.

use crate::results::{QuestionResult, Section, TextResult};
use crate::visibility::ViewContext;

/// Redact one result list, preserving order.
///
/// Text results keep only visible answers and vanish when none remain.
/// Rating and yes/no results are always kept; without grade entitlement
/// their numeric detail is cleared.
pub fn redact_results(results: &[QuestionResult], ctx: &ViewContext<'_>) -> Vec<QuestionResult> {
    results
        .iter()
        .filter_map(|result| match result {
            QuestionResult::Text(text) => {
                let answers: Vec<_> = text
                    .answers
                    .iter()
                    .filter(|a| ctx.can_view_text_answer(a))
                    .cloned()
                    .collect();
                if answers.is_empty() {
                    None
                } else {
                    Some(QuestionResult::Text(TextResult {
                        question: text.question.clone(),
                        answers,
                    }))
                }
            }
            QuestionResult::Rating(rating) if !ctx.show_grades => {
                Some(QuestionResult::Rating(rating.redacted()))
            }
            QuestionResult::YesNo(yes_no) if !ctx.show_grades => {
                Some(QuestionResult::YesNo(yes_no.redacted()))
            }
            QuestionResult::Rating(_) | QuestionResult::YesNo(_) | QuestionResult::Heading(_) => {
                Some(result.clone())
            }
        })
        .collect()
}

/// Redact every section. Sections are kept even if they end up empty.
pub fn redact_sections(sections: &[Section], ctx: &ViewContext<'_>) -> Vec<Section> {
    sections
        .iter()
        .map(|section| section.with_results(redact_results(&section.results, ctx)))
        .collect()
}
