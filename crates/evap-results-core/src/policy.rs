//! Standard per-course entitlement rules.

use crate::config::ResultsConfig;
use crate::model::{Course, CourseState, Viewer};
use crate::traits::CoursePolicy;

/// Entitlements driven by the voter thresholds from [`ResultsConfig`].
#[derive(Debug, Clone)]
pub struct StandardPolicy {
    pub min_voter_count: u32,
    pub min_voter_percentage: f64,
}

impl StandardPolicy {
    pub fn new(min_voter_count: u32, min_voter_percentage: f64) -> Self {
        Self {
            min_voter_count,
            min_voter_percentage,
        }
    }

    pub fn from_config(config: &ResultsConfig) -> Self {
        Self::new(config.min_voter_count, config.min_voter_percentage)
    }
}

impl Default for StandardPolicy {
    fn default() -> Self {
        Self::from_config(&ResultsConfig::default())
    }
}

impl CoursePolicy for StandardPolicy {
    fn can_user_see_course(&self, course: &Course, viewer: &Viewer) -> bool {
        if viewer.is_reviewer || course.is_user_contributor_or_delegate(viewer) {
            return true;
        }
        if course.is_private {
            return course.is_participant(viewer.id);
        }
        viewer.is_internal
    }

    fn can_user_see_grades(&self, course: &Course, viewer: &Viewer) -> bool {
        if viewer.is_reviewer {
            return true;
        }
        if !self.has_enough_voters_to_publish_grades(course) {
            return false;
        }
        self.can_user_see_course(course, viewer)
    }

    fn can_user_see_results_page(&self, course: &Course, viewer: &Viewer) -> bool {
        if viewer.is_reviewer {
            return true;
        }
        if course.state != CourseState::Published {
            return false;
        }
        if course.is_user_contributor_or_delegate(viewer) {
            return true;
        }
        if !self.has_enough_voters_to_publish_grades(course) {
            return false;
        }
        self.can_user_see_course(course, viewer)
    }

    fn has_enough_voters_to_publish_grades(&self, course: &Course) -> bool {
        if course.num_voters < self.min_voter_count || course.num_participants == 0 {
            return false;
        }
        f64::from(course.num_voters) / f64::from(course.num_participants)
            >= self.min_voter_percentage
    }
}
