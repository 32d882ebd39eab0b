//! Aggregates a class's enrollments into a [`ReportData`].

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tracing::debug;

use crate::approval::{ApprovalPolicy, ApprovalStatus, DefaultApprovalPolicy};
use crate::class::Class;
use crate::enrollment::Evaluation;
use crate::grade::Grade;
use crate::report::types::{
    AverageSource, GoalPerformance, GradeDistribution, ReportData, StudentReport,
};
use crate::report::util::{mean, round2};
use crate::specification::AverageSpecification;

/// Weighted average over the evaluations, with the unweighted fallback made
/// explicit instead of exception-driven.
///
/// Returns `None` when there are no evaluations. When the specification's
/// weighted average is not a finite number (a grade missing from the weight
/// map poisons it to NaN), falls back to the plain mean of the grade
/// weights, unweighted by goal.
pub fn pre_final_average(
    specification: &AverageSpecification,
    evaluations: &[Evaluation],
) -> Option<(f64, AverageSource)> {
    if evaluations.is_empty() {
        return None;
    }

    let goal_grades: HashMap<String, Grade> = evaluations
        .iter()
        .map(|e| (e.goal.clone(), e.grade))
        .collect();

    let weighted = specification.calc(&goal_grades);
    if weighted.is_finite() {
        return Some((weighted, AverageSource::Weighted));
    }

    let fallback = mean(
        &evaluations
            .iter()
            .map(|e| grade_score(specification, e.grade))
            .collect::<Vec<_>>(),
    );
    Some((fallback, AverageSource::FallbackMean))
}

fn grade_score(specification: &AverageSpecification, grade: Grade) -> f64 {
    specification
        .grade_weight(grade)
        .filter(|w| w.is_finite())
        .unwrap_or_else(|| grade.default_weight())
}

/// Produces a [`ReportData`] from a class, an average specification, and an
/// approval policy.
pub struct ReportAggregator<P = DefaultApprovalPolicy> {
    policy: P,
}

impl ReportAggregator<DefaultApprovalPolicy> {
    pub fn new() -> Self {
        Self {
            policy: DefaultApprovalPolicy::default(),
        }
    }
}

impl Default for ReportAggregator<DefaultApprovalPolicy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ApprovalPolicy> ReportAggregator<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    pub fn generate(&self, class: &Class) -> ReportData {
        let specification = class.specification();

        let mut students = Vec::with_capacity(class.enrollments().len());
        let mut final_grades = Vec::new();
        let mut per_goal: BTreeMap<String, (GradeDistribution, Vec<f64>)> = BTreeMap::new();

        for enrollment in class.enrollments() {
            let evaluations = enrollment.evaluations();

            for eval in &evaluations {
                let (distribution, scores) = per_goal.entry(eval.goal.clone()).or_default();
                match eval.grade {
                    Grade::Ma => distribution.ma += 1,
                    Grade::Mpa => distribution.mpa += 1,
                    Grade::Mana => distribution.mana += 1,
                }
                scores.push(grade_score(specification, eval.grade));
            }

            // recorded average wins; otherwise derive from the evaluations
            let pre_final = enrollment
                .recorded_pre_final()
                .map(|v| (v, AverageSource::Recorded))
                .or_else(|| pre_final_average(specification, &evaluations));
            let pre_value = pre_final.map(|(value, _)| value);

            let status = self.policy.determine_status(
                pre_value,
                enrollment.media_pos_final,
                enrollment.failed_by_absence,
            );

            // final grade mirrors the pre-final precedence, preferring the
            // post-final average when one is recorded
            let final_value = enrollment.recorded_pos_final().or(pre_value);

            let final_grade = match status {
                ApprovalStatus::Pending => None,
                _ => final_value,
            };
            if let Some(value) = final_grade {
                final_grades.push(value);
            }

            debug!(
                cpf = %enrollment.student().cpf(),
                status = ?status,
                pre = ?pre_value,
                "student aggregated"
            );

            students.push(StudentReport {
                cpf: enrollment.student().cpf().to_string(),
                name: enrollment.student().name().to_string(),
                status,
                pre_final: pre_value,
                final_grade,
            });
        }

        let students_average = if final_grades.is_empty() {
            None
        } else {
            Some(round2(mean(&final_grades)))
        };

        let goals = per_goal
            .into_iter()
            .map(|(goal, (distribution, scores))| GoalPerformance {
                goal,
                evaluated: scores.len(),
                distribution,
                average_score: mean(&scores),
            })
            .collect();

        ReportData {
            generated_at: Utc::now(),
            topic: class.topic.clone(),
            semester: class.semester,
            year: class.year,
            students_average,
            goals,
            students,
        }
    }
}
