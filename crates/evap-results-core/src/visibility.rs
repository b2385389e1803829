//! Who may read which free-text answer.
//!
//! All checks here fail closed: an answer whose contribution cannot be
//! resolved, or that matches no granting rule, is not shown.

use std::collections::BTreeSet;

use crate::model::{CommentVisibility, Course, TextAnswer, TextAnswerState, UserId, Viewer};

/// Answer states that may be released to anyone at all.
pub const COMMENT_STATES_REQUIRED_FOR_VISIBILITY: [TextAnswerState; 2] =
    [TextAnswerState::Private, TextAnswerState::Published];

/// Whether `viewer` may read `answer` on `course`.
///
/// `represented` is the viewer plus every user who delegated to them.
pub fn can_view_text_answer(
    viewer: &Viewer,
    represented: &BTreeSet<UserId>,
    course: &Course,
    answer: &TextAnswer,
    public_view: bool,
) -> bool {
    if public_view {
        return false;
    }
    if !COMMENT_STATES_REQUIRED_FOR_VISIBILITY.contains(&answer.state) {
        return false;
    }
    if viewer.is_reviewer {
        return true;
    }

    let Some(contribution) = course.contribution(answer.contribution) else {
        tracing::warn!(
            "text answer {} references unknown contribution {} on course {}",
            answer.id,
            answer.contribution,
            course.id
        );
        return false;
    };
    let contributor = contribution.contributor;

    if answer.is_private() {
        return contributor == Some(viewer.id);
    }

    if answer.is_published() {
        if contribution.responsible {
            return match contributor {
                Some(c) => c == viewer.id || viewer.is_delegate_of(c),
                None => false,
            };
        }

        if contributor.is_some_and(|c| represented.contains(&c)) {
            return true;
        }
        if course.has_contribution_with_visibility(represented, CommentVisibility::AllComments) {
            return true;
        }
        if contribution.is_general()
            && course.has_contribution_with_visibility(represented, CommentVisibility::CourseComments)
        {
            return true;
        }
    }

    false
}

/// Everything the redaction stage needs to know about one request.
#[derive(Debug, Clone)]
pub struct ViewContext<'a> {
    pub viewer: &'a Viewer,
    pub course: &'a Course,
    pub represented: BTreeSet<UserId>,
    pub public_view: bool,
    pub show_grades: bool,
}

impl<'a> ViewContext<'a> {
    pub fn new(viewer: &'a Viewer, course: &'a Course, public_view: bool, show_grades: bool) -> Self {
        Self {
            viewer,
            course,
            represented: viewer.represented_users(),
            public_view,
            show_grades,
        }
    }

    pub fn can_view_text_answer(&self, answer: &TextAnswer) -> bool {
        can_view_text_answer(
            self.viewer,
            &self.represented,
            self.course,
            answer,
            self.public_view,
        )
    }
}
