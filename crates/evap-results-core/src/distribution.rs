//! Grade distributions and the per-course distribution summary.

use serde::{Deserialize, Serialize};

use crate::model::Course;
use crate::traits::ResultCalculator;

/// Share of answers per grade, best grade first. Shares sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(pub Vec<f64>);

/// Weighted mean grade of a distribution, grades numbered from 1.
pub fn distribution_to_grade(distribution: Option<&Distribution>) -> Option<f64> {
    let distribution = distribution?;
    if distribution.0.is_empty() {
        return None;
    }
    Some(
        distribution
            .0
            .iter()
            .enumerate()
            .map(|(i, share)| share * (i + 1) as f64)
            .sum(),
    )
}

/// Distribution and grade attached to a course for display.
///
/// Both are `None` when the viewer may not see grades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub distribution: Option<Distribution>,
    pub avg_grade: Option<f64>,
}

impl DistributionSummary {
    /// Compute the summary once for a course.
    pub fn compute(
        course: &Course,
        calculator: &dyn ResultCalculator,
        show_grades: bool,
    ) -> Self {
        let distribution = if show_grades {
            calculator.average_distribution(course)
        } else {
            None
        };
        let avg_grade = calculator.distribution_to_grade(distribution.as_ref());
        Self {
            distribution,
            avg_grade,
        }
    }
}
