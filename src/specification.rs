//! Weighted-average specification for a class.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::grade::Grade;

/// Maps grade levels to numeric weights and goal names to importance
/// weights, and turns a set of (goal, grade) pairs into a weighted average.
///
/// The denominator of [`AverageSpecification::calc`] is fixed at
/// construction time: it is always the full goal-weight sum, so an unscored
/// goal contributes zero while still diluting the average.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SpecificationData")]
pub struct AverageSpecification {
    grade_weights: HashMap<Grade, f64>,
    goal_weights: HashMap<String, f64>,
    #[serde(skip_serializing)]
    goal_weight_sum: f64,
}

/// Raw persisted shape: the two weight maps as plain objects.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpecificationData {
    grade_weights: HashMap<Grade, f64>,
    goal_weights: HashMap<String, f64>,
}

impl TryFrom<SpecificationData> for AverageSpecification {
    type Error = DomainError;

    fn try_from(data: SpecificationData) -> DomainResult<Self> {
        AverageSpecification::new(data.grade_weights, data.goal_weights)
    }
}

impl AverageSpecification {
    /// Fails with [`DomainError::ZeroGoalWeightSum`] when the goal weights
    /// sum to zero, since that sum is the fixed denominator of `calc`.
    pub fn new(
        grade_weights: HashMap<Grade, f64>,
        goal_weights: HashMap<String, f64>,
    ) -> DomainResult<Self> {
        let goal_weight_sum: f64 = goal_weights.values().sum();
        if goal_weight_sum == 0.0 {
            return Err(DomainError::ZeroGoalWeightSum);
        }
        Ok(Self {
            grade_weights,
            goal_weights,
            goal_weight_sum,
        })
    }

    /// Weighted average of the given goal grades.
    ///
    /// Only goals present in both the input map and the goal weights feed
    /// the numerator; the denominator is the full goal-weight sum. A grade
    /// with no weight in the map poisons the result to NaN, which the
    /// report layer recovers from with an unweighted fallback.
    pub fn calc(&self, goal_grades: &HashMap<String, Grade>) -> f64 {
        let mut numerator = 0.0;
        for (goal, grade) in goal_grades {
            let Some(goal_weight) = self.goal_weights.get(goal) else {
                continue;
            };
            let grade_weight = self
                .grade_weights
                .get(grade)
                .copied()
                .unwrap_or(f64::NAN);
            numerator += goal_weight * grade_weight;
        }
        numerator / self.goal_weight_sum
    }

    pub fn grade_weight(&self, grade: Grade) -> Option<f64> {
        self.grade_weights.get(&grade).copied()
    }

    pub fn goal_weights(&self) -> &HashMap<String, f64> {
        &self.goal_weights
    }

    pub fn goal_weight_sum(&self) -> f64 {
        self.goal_weight_sum
    }
}
