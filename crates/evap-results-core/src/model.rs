//! Core data model types for evap-results.
//!
//! These records are what the data-access layer hands to the pipeline:
//! semesters, courses, contributions, text answers, and the viewer asking
//! for a page.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }
    };
}

id_type!(
    /// Identifies a user (viewer, contributor, participant).
    UserId
);
id_type!(SemesterId);
id_type!(CourseId);
id_type!(DegreeId);
id_type!(ContributionId);
id_type!(QuestionId);
id_type!(QuestionnaireId);
id_type!(TextAnswerId);

/// Lifecycle of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseState {
    New,
    Prepared,
    EditorApproved,
    Approved,
    InEvaluation,
    Evaluated,
    Reviewed,
    Published,
}

impl CourseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseState::New => "new",
            CourseState::Prepared => "prepared",
            CourseState::EditorApproved => "editor_approved",
            CourseState::Approved => "approved",
            CourseState::InEvaluation => "in_evaluation",
            CourseState::Evaluated => "evaluated",
            CourseState::Reviewed => "reviewed",
            CourseState::Published => "published",
        }
    }

    /// States in which the evaluation has closed and grades exist.
    pub fn has_finished_evaluation(&self) -> bool {
        matches!(
            self,
            CourseState::Evaluated | CourseState::Reviewed | CourseState::Published
        )
    }
}

impl fmt::Display for CourseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(CourseState::New),
            "prepared" => Ok(CourseState::Prepared),
            "editor_approved" => Ok(CourseState::EditorApproved),
            "approved" => Ok(CourseState::Approved),
            "in_evaluation" => Ok(CourseState::InEvaluation),
            "evaluated" => Ok(CourseState::Evaluated),
            "reviewed" => Ok(CourseState::Reviewed),
            "published" => Ok(CourseState::Published),
            other => Err(format!("unknown course state: {other}")),
        }
    }
}

/// Who besides the contributor may read comments on a contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentVisibility {
    /// Only the contributor's own comments.
    #[default]
    OwnComments,
    /// Comments about the course as a whole.
    CourseComments,
    /// Every comment on the course.
    AllComments,
}

/// Review state of a free-text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnswerState {
    NotReviewed,
    Published,
    Private,
    Hidden,
}

/// A contributor's participation in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    /// `None` for the general, course-level contribution.
    #[serde(default)]
    pub contributor: Option<UserId>,
    #[serde(default)]
    pub responsible: bool,
    #[serde(default)]
    pub comment_visibility: CommentVisibility,
}

impl Contribution {
    /// A general contribution is about the course, not a person.
    pub fn is_general(&self) -> bool {
        self.contributor.is_none()
    }
}

/// A single free-text answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnswer {
    pub id: TextAnswerId,
    pub contribution: ContributionId,
    pub text: String,
    pub state: TextAnswerState,
}

impl TextAnswer {
    pub fn is_private(&self) -> bool {
        self.state == TextAnswerState::Private
    }

    pub fn is_published(&self) -> bool {
        self.state == TextAnswerState::Published
    }
}

/// A study programme; courses are listed once per degree they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degree {
    pub id: DegreeId,
    pub name: String,
    /// Position in the catalog.
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub id: SemesterId,
    pub name: String,
}

/// An evaluated course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub semester: SemesterId,
    pub name: String,
    /// Name of the course type (lecture, seminar, ...).
    #[serde(rename = "type")]
    pub course_type: String,
    #[serde(default)]
    pub degrees: Vec<DegreeId>,
    pub state: CourseState,
    #[serde(default)]
    pub is_single_result: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub num_voters: u32,
    #[serde(default)]
    pub num_participants: u32,
    #[serde(default)]
    pub participants: Vec<UserId>,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
    /// Number of text answers stored for this course, regardless of state.
    #[serde(default)]
    pub num_text_answers: u32,
}

impl Course {
    pub fn contribution(&self, id: ContributionId) -> Option<&Contribution> {
        self.contributions.iter().find(|c| c.id == id)
    }

    /// The viewer contributes, or someone who delegated to the viewer does.
    pub fn is_user_contributor_or_delegate(&self, viewer: &Viewer) -> bool {
        self.contributions.iter().any(|c| match c.contributor {
            Some(contributor) => contributor == viewer.id || viewer.is_delegate_of(contributor),
            None => false,
        })
    }

    pub fn is_participant(&self, user: UserId) -> bool {
        self.participants.contains(&user)
    }

    /// Whether any contribution by one of `users` grants `visibility`.
    pub fn has_contribution_with_visibility(
        &self,
        users: &BTreeSet<UserId>,
        visibility: CommentVisibility,
    ) -> bool {
        self.contributions.iter().any(|c| {
            c.comment_visibility == visibility
                && c.contributor.is_some_and(|u| users.contains(&u))
        })
    }
}

/// The user requesting a results page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    pub id: UserId,
    #[serde(default)]
    pub is_reviewer: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default = "default_true")]
    pub is_internal: bool,
    /// Users who delegated result viewing to this viewer.
    #[serde(default)]
    pub delegators: BTreeSet<UserId>,
    #[serde(default)]
    pub can_download_grades: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(UserId::default())
    }
}

impl Viewer {
    /// An internal viewer without roles or delegations.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            is_reviewer: false,
            is_staff: false,
            is_internal: true,
            delegators: BTreeSet::new(),
            can_download_grades: false,
        }
    }

    /// Whether `user` registered this viewer as a delegate.
    pub fn is_delegate_of(&self, user: UserId) -> bool {
        self.delegators.contains(&user)
    }

    /// The viewer plus everyone they represent.
    pub fn represented_users(&self) -> BTreeSet<UserId> {
        let mut users = self.delegators.clone();
        users.insert(self.id);
        users
    }
}
