//! Result types produced by the result calculator.
//!
//! A course's results arrive as an ordered list of [`Section`]s, one per
//! questionnaire and (optionally) contributor, each holding the
//! per-question [`QuestionResult`]s in questionnaire order.

use serde::{Deserialize, Serialize};

use crate::model::{QuestionId, QuestionnaireId, TextAnswer, UserId};

/// What kind of answer a question collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Rating,
    YesNo,
    Text,
    Heading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionKind,
}

/// Aggregated answers to a rating question.
///
/// `average` and `counts` are `None` exactly when the viewer may not see
/// grades for the course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingResult {
    pub question: Question,
    pub total_count: u32,
    pub average: Option<f64>,
    pub counts: Option<Vec<u32>>,
    #[serde(default)]
    pub warning: bool,
}

impl RatingResult {
    /// Same result with the numeric detail removed.
    pub fn redacted(&self) -> Self {
        Self {
            question: self.question.clone(),
            total_count: self.total_count,
            average: None,
            counts: None,
            warning: self.warning,
        }
    }
}

/// Aggregated answers to a yes/no question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YesNoResult {
    pub question: Question,
    pub total_count: u32,
    pub average: Option<f64>,
    pub counts: Option<Vec<u32>>,
    #[serde(default)]
    pub warning: bool,
    pub approval_count: Option<u32>,
}

impl YesNoResult {
    /// Same result with the numeric detail removed.
    pub fn redacted(&self) -> Self {
        Self {
            question: self.question.clone(),
            total_count: self.total_count,
            average: None,
            counts: None,
            warning: self.warning,
            approval_count: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextResult {
    pub question: Question,
    pub answers: Vec<TextAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingResult {
    pub question: Question,
}

/// The result for one question of a questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionResult {
    Rating(RatingResult),
    YesNo(YesNoResult),
    Text(TextResult),
    Heading(HeadingResult),
}

impl QuestionResult {
    pub fn question(&self) -> &Question {
        match self {
            QuestionResult::Rating(r) => &r.question,
            QuestionResult::YesNo(r) => &r.question,
            QuestionResult::Text(r) => &r.question,
            QuestionResult::Heading(r) => &r.question,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, QuestionResult::Heading(_))
    }

    /// Number of votes for rating-bearing results, `None` otherwise.
    pub fn total_count(&self) -> Option<u32> {
        match self {
            QuestionResult::Rating(r) => Some(r.total_count),
            QuestionResult::YesNo(r) => Some(r.total_count),
            QuestionResult::Text(_) | QuestionResult::Heading(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub id: QuestionnaireId,
    pub name: String,
    /// Course-level questionnaires flagged here are shown after the
    /// contributor sections instead of before them.
    #[serde(default)]
    pub is_below_contributors: bool,
}

/// One questionnaire's results for a course, optionally scoped to a
/// contributor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub questionnaire: Questionnaire,
    /// `None` for general, course-level sections.
    #[serde(default)]
    pub contributor: Option<UserId>,
    #[serde(default)]
    pub label: Option<String>,
    pub results: Vec<QuestionResult>,
}

impl Section {
    /// The same section carrying a different result list.
    pub fn with_results(&self, results: Vec<QuestionResult>) -> Self {
        Self {
            questionnaire: self.questionnaire.clone(),
            contributor: self.contributor,
            label: self.label.clone(),
            results,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
