//! Error types for the grade engine.
//!
//! Every variant is recoverable by the caller; import errors carry the
//! offending CPF and goal so the surrounding layer can report them.

use thiserror::Error;
use uuid::Uuid;

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Construction-time configuration error, never silently defaulted.
    #[error("goal-weight sum cannot be zero")]
    ZeroGoalWeightSum,

    /// Metas are write-once per class.
    #[error("metas are already locked for this class")]
    MetasLocked,

    #[error("blank meta label at position {position}")]
    BlankMetaLabel { position: usize },

    #[error("duplicate meta label {label:?}")]
    DuplicateMetaLabel { label: String },

    #[error("student {cpf} is already enrolled")]
    AlreadyEnrolled { cpf: String },

    /// Import row resolution failed for the given CPF.
    #[error("no enrollment found for cpf {cpf:?}")]
    EnrollmentNotFound { cpf: String },

    /// A spreadsheet cell held something other than MANA/MPA/MA.
    #[error("invalid grade {value:?} for goal {goal:?} (cpf {cpf:?})")]
    InvalidGrade {
        cpf: String,
        goal: String,
        value: String,
    },

    /// Phase-2 token that was never issued, already used, or expired.
    #[error("unknown or expired import session {token}")]
    UnknownSession { token: Uuid },

    #[error("unsupported spreadsheet format for {path:?}")]
    UnsupportedFormat { path: String },

    #[error(transparent)]
    Spreadsheet(#[from] SpreadsheetError),
}

/// Failures while reading CSV/XLSX input.
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("csv read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx read failed: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("workbook has no sheets")]
    EmptyWorkbook,
}
