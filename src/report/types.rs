//! Value objects produced by report generation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::approval::ApprovalStatus;

/// How a student's numeric average was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageSource {
    /// The recorded pre/post-final field on the enrollment.
    Recorded,
    /// The specification's weighted average over the evaluations.
    Weighted,
    /// Unweighted mean of grade weights, used when the weighted average is
    /// not a finite number.
    FallbackMean,
}

/// How many of each grade level a goal received across the class.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GradeDistribution {
    pub ma: usize,
    pub mpa: usize,
    pub mana: usize,
}

/// Aggregated performance for a single goal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPerformance {
    pub goal: String,
    /// Number of students with an instructor evaluation for this goal.
    pub evaluated: usize,
    pub distribution: GradeDistribution,
    pub average_score: f64,
}

/// Per-student line of the report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    pub cpf: String,
    pub name: String,
    pub status: ApprovalStatus,
    pub pre_final: Option<f64>,
    /// Suppressed (`None`) whenever the status is PENDING.
    pub final_grade: Option<f64>,
}

/// Complete report for one class, computed fresh on each request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub topic: String,
    pub semester: u8,
    pub year: i32,
    /// Mean of final grades over non-PENDING students, rounded to 2
    /// decimals; `None` when no such student exists.
    pub students_average: Option<f64>,
    pub goals: Vec<GoalPerformance>,
    pub students: Vec<StudentReport>,
}
