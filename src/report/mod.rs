//! Class report generation.
//!
//! This module consumes a class's enrollments, its average specification,
//! and an approval policy to produce class-wide statistics and a per-student
//! listing. Reports are computed fresh on each request and never stored.

pub mod aggregate;
pub mod types;
pub mod util;

pub use aggregate::{ReportAggregator, pre_final_average};
pub use types::{
    AverageSource, GoalPerformance, GradeDistribution, ReportData, StudentReport,
};
