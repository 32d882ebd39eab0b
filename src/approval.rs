//! Approval-status policy.
//!
//! No transitions are stored anywhere: a status is recomputed from the
//! current averages and flags every time it is asked for.

use serde::{Deserialize, Serialize};

/// Per-student approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    ApprovedFinal,
    Failed,
    FailedByAbsence,
}

fn usable(average: Option<f64>) -> Option<f64> {
    average.filter(|v| *v != 0.0)
}

/// Grading policy: three thresholds plus the status decision built on them.
/// Alternate policies substitute without touching callers.
pub trait ApprovalPolicy: Send + Sync {
    /// Pre-final average at or above this approves directly.
    fn direct_approval_threshold(&self) -> f64;

    /// Pre-final average below this fails outright; between this and the
    /// direct-approval threshold the student awaits the final exam.
    fn final_exam_eligibility_threshold(&self) -> f64;

    /// Post-final average at or above this approves after the final exam.
    fn post_final_approval_threshold(&self) -> f64;

    /// Maps the current averages and flags to a status. Absence failure
    /// overrides everything; a usable post-final average settles the case
    /// next; otherwise the pre-final average decides. Both averages treat
    /// `None` and `0.0` as "not yet computed".
    fn determine_status(
        &self,
        pre_final: Option<f64>,
        pos_final: Option<f64>,
        failed_by_absence: bool,
    ) -> ApprovalStatus {
        if failed_by_absence {
            return ApprovalStatus::FailedByAbsence;
        }
        if let Some(pos) = usable(pos_final) {
            return if pos >= self.post_final_approval_threshold() {
                ApprovalStatus::ApprovedFinal
            } else {
                ApprovalStatus::Failed
            };
        }
        let Some(pre) = usable(pre_final) else {
            return ApprovalStatus::Pending;
        };
        if pre >= self.direct_approval_threshold() {
            ApprovalStatus::Approved
        } else if pre < self.final_exam_eligibility_threshold() {
            ApprovalStatus::Failed
        } else {
            ApprovalStatus::Pending
        }
    }
}

/// Default policy: approve at 7.0, fail below 3.0, approve post-final at 5.0.
#[derive(Debug, Clone, Copy)]
pub struct DefaultApprovalPolicy {
    pub direct_approval: f64,
    pub final_exam_eligibility: f64,
    pub post_final_approval: f64,
}

impl Default for DefaultApprovalPolicy {
    fn default() -> Self {
        Self {
            direct_approval: 7.0,
            final_exam_eligibility: 3.0,
            post_final_approval: 5.0,
        }
    }
}

impl ApprovalPolicy for DefaultApprovalPolicy {
    fn direct_approval_threshold(&self) -> f64 {
        self.direct_approval
    }

    fn final_exam_eligibility_threshold(&self) -> f64 {
        self.final_exam_eligibility
    }

    fn post_final_approval_threshold(&self) -> f64 {
        self.post_final_approval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(
        pre: Option<f64>,
        pos: Option<f64>,
        failed_by_absence: bool,
    ) -> ApprovalStatus {
        DefaultApprovalPolicy::default().determine_status(pre, pos, failed_by_absence)
    }

    #[test]
    fn test_absence_overrides_everything() {
        assert_eq!(
            status(Some(9.5), Some(9.5), true),
            ApprovalStatus::FailedByAbsence
        );
        assert_eq!(status(None, None, true), ApprovalStatus::FailedByAbsence);
    }

    #[test]
    fn test_post_final_settles_the_case() {
        assert_eq!(status(Some(2.0), Some(5.0), false), ApprovalStatus::ApprovedFinal);
        assert_eq!(status(Some(9.0), Some(4.9), false), ApprovalStatus::Failed);
    }

    #[test]
    fn test_pre_final_thresholds() {
        assert_eq!(status(Some(7.0), None, false), ApprovalStatus::Approved);
        assert_eq!(status(Some(6.9), None, false), ApprovalStatus::Pending);
        assert_eq!(status(Some(3.0), None, false), ApprovalStatus::Pending);
        assert_eq!(status(Some(2.9), None, false), ApprovalStatus::Failed);
    }

    #[test]
    fn test_no_data_is_pending() {
        assert_eq!(status(None, None, false), ApprovalStatus::Pending);
    }

    #[test]
    fn test_zero_averages_count_as_not_computed() {
        // An all-MANA average of exactly 0.0 reads as "no data yet" — the
        // source system's sentinel, preserved on purpose.
        assert_eq!(status(Some(0.0), None, false), ApprovalStatus::Pending);
        assert_eq!(status(Some(8.0), Some(0.0), false), ApprovalStatus::Approved);
    }

    #[test]
    fn test_custom_thresholds_shift_the_boundaries() {
        let lenient = DefaultApprovalPolicy {
            direct_approval: 5.0,
            final_exam_eligibility: 2.0,
            post_final_approval: 4.0,
        };
        assert_eq!(
            lenient.determine_status(Some(5.0), None, false),
            ApprovalStatus::Approved
        );
        assert_eq!(
            lenient.determine_status(None, Some(4.0), false),
            ApprovalStatus::ApprovedFinal
        );
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&ApprovalStatus::FailedByAbsence).unwrap(),
            "\"FAILED_BY_ABSENCE\""
        );
        assert_eq!(
            serde_json::to_string(&ApprovalStatus::ApprovedFinal).unwrap(),
            "\"APPROVED_FINAL\""
        );
    }
}
