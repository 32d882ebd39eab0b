//! Per-student, per-class grade ledger.
//!
//! An enrollment holds two independent (goal → grade) collections — the
//! instructor's evaluations and the student's self-evaluations — plus the
//! recorded pre/post-final averages and the absence-failure flag.

use serde::{Deserialize, Serialize};

use crate::grade::Grade;
use crate::student::{Student, normalize_cpf};

/// The atomic unit of assessment: a grade recorded against a named goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub goal: String,
    pub grade: Grade,
}

/// Selects one of the two ledgers of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationKind {
    Evaluation,
    SelfEvaluation,
}

/// A student's membership in a class, created on join and destroyed with it.
///
/// Goal uniqueness is enforced per ledger by upsert; the averages are plain
/// settable fields (derivation is the report aggregator's job). Downstream
/// consumers treat both `None` and `0.0` as "not yet computed".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "EnrollmentData", into = "EnrollmentData")]
pub struct Enrollment {
    student: Student,
    evaluations: Vec<Evaluation>,
    self_evaluations: Vec<Evaluation>,
    pub media_pre_final: Option<f64>,
    pub media_pos_final: Option<f64>,
    pub failed_by_absence: bool,
}

/// Persisted shape; the student is flattened down to their CPF.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrollmentData {
    #[serde(rename = "studentCPF")]
    student_cpf: String,
    #[serde(default)]
    evaluations: Vec<Evaluation>,
    #[serde(default)]
    self_evaluations: Vec<Evaluation>,
    media_pre_final: Option<f64>,
    media_pos_final: Option<f64>,
    #[serde(default)]
    failed_by_absence: bool,
}

impl From<EnrollmentData> for Enrollment {
    fn from(data: EnrollmentData) -> Self {
        Self {
            student: Student::new(data.student_cpf, ""),
            evaluations: data.evaluations,
            self_evaluations: data.self_evaluations,
            media_pre_final: data.media_pre_final,
            media_pos_final: data.media_pos_final,
            failed_by_absence: data.failed_by_absence,
        }
    }
}

impl From<Enrollment> for EnrollmentData {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            student_cpf: enrollment.student.cpf().to_string(),
            evaluations: enrollment.evaluations,
            self_evaluations: enrollment.self_evaluations,
            media_pre_final: enrollment.media_pre_final,
            media_pos_final: enrollment.media_pos_final,
            failed_by_absence: enrollment.failed_by_absence,
        }
    }
}

fn upsert(list: &mut Vec<Evaluation>, goal: &str, grade: Grade) {
    match list.iter_mut().find(|e| e.goal == goal) {
        Some(existing) => existing.grade = grade,
        None => list.push(Evaluation {
            goal: goal.to_string(),
            grade,
        }),
    }
}

fn remove(list: &mut Vec<Evaluation>, goal: &str) -> bool {
    let before = list.len();
    list.retain(|e| e.goal != goal);
    list.len() < before
}

impl Enrollment {
    pub fn new(student: Student) -> Self {
        Self {
            student,
            evaluations: Vec::new(),
            self_evaluations: Vec::new(),
            media_pre_final: None,
            media_pos_final: None,
            failed_by_absence: false,
        }
    }

    pub fn student(&self) -> &Student {
        &self.student
    }

    /// True when `cpf` resolves to this enrollment's student after
    /// normalization.
    pub fn matches_cpf(&self, cpf: &str) -> bool {
        self.student.cpf() == normalize_cpf(cpf)
    }

    fn ledger(&self, kind: EvaluationKind) -> &Vec<Evaluation> {
        match kind {
            EvaluationKind::Evaluation => &self.evaluations,
            EvaluationKind::SelfEvaluation => &self.self_evaluations,
        }
    }

    fn ledger_mut(&mut self, kind: EvaluationKind) -> &mut Vec<Evaluation> {
        match kind {
            EvaluationKind::Evaluation => &mut self.evaluations,
            EvaluationKind::SelfEvaluation => &mut self.self_evaluations,
        }
    }

    pub fn add_or_update_for(&mut self, kind: EvaluationKind, goal: &str, grade: Grade) {
        upsert(self.ledger_mut(kind), goal, grade);
    }

    pub fn find_for(&self, kind: EvaluationKind, goal: &str) -> Option<&Evaluation> {
        self.ledger(kind).iter().find(|e| e.goal == goal)
    }

    pub fn add_or_update_evaluation(&mut self, goal: &str, grade: Grade) {
        upsert(&mut self.evaluations, goal, grade);
    }

    pub fn add_or_update_self_evaluation(&mut self, goal: &str, grade: Grade) {
        upsert(&mut self.self_evaluations, goal, grade);
    }

    pub fn remove_evaluation(&mut self, goal: &str) -> bool {
        remove(&mut self.evaluations, goal)
    }

    pub fn remove_self_evaluation(&mut self, goal: &str) -> bool {
        remove(&mut self.self_evaluations, goal)
    }

    pub fn find_evaluation(&self, goal: &str) -> Option<&Evaluation> {
        self.evaluations.iter().find(|e| e.goal == goal)
    }

    pub fn find_self_evaluation(&self, goal: &str) -> Option<&Evaluation> {
        self.self_evaluations.iter().find(|e| e.goal == goal)
    }

    /// Snapshot of the instructor ledger. Mutating the returned list does
    /// not touch the enrollment.
    pub fn evaluations(&self) -> Vec<Evaluation> {
        self.evaluations.clone()
    }

    /// Snapshot of the self-evaluation ledger.
    pub fn self_evaluations(&self) -> Vec<Evaluation> {
        self.self_evaluations.clone()
    }

    /// Upserts every instructor evaluation of `other` into this enrollment,
    /// goal by goal. Entries absent from `other` are preserved.
    pub fn merge_evaluations_from(&mut self, other: &Enrollment) {
        for eval in &other.evaluations {
            upsert(&mut self.evaluations, &eval.goal, eval.grade);
        }
    }

    /// Same as [`Enrollment::merge_evaluations_from`], over self-evaluations.
    pub fn merge_self_evaluations_from(&mut self, other: &Enrollment) {
        for eval in &other.self_evaluations {
            upsert(&mut self.self_evaluations, &eval.goal, eval.grade);
        }
    }

    /// Recorded pre-final average, with the zero sentinel filtered out.
    pub fn recorded_pre_final(&self) -> Option<f64> {
        self.media_pre_final.filter(|v| *v != 0.0)
    }

    /// Recorded post-final average, with the zero sentinel filtered out.
    pub fn recorded_pos_final(&self) -> Option<f64> {
        self.media_pos_final.filter(|v| *v != 0.0)
    }
}
