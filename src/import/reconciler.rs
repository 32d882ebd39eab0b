//! Two-phase reconciliation of spreadsheet grades against enrollments.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::class::Class;
use crate::enrollment::EvaluationKind;
use crate::error::{DomainError, DomainResult};
use crate::grade::Grade;
use crate::import::session::{ImportSession, ImportSessionStore};
use crate::spreadsheet::{self, SpreadsheetFormat};
use crate::student::normalize_cpf;

/// Mandatory identifier column expected in every import.
pub const CPF_COLUMN: &str = "cpf";

/// Preconfigured goal columns expected per evaluation kind. Independent of
/// both the class metas and the specification goal weights.
#[derive(Debug, Clone, Default)]
pub struct ImportGoalColumns {
    pub evaluation: Vec<String>,
    pub self_evaluation: Vec<String>,
}

impl ImportGoalColumns {
    /// The same goal list for both kinds.
    pub fn uniform(goals: Vec<String>) -> Self {
        Self {
            evaluation: goals.clone(),
            self_evaluation: goals,
        }
    }

    fn for_kind(&self, kind: EvaluationKind) -> &[String] {
        match kind {
            EvaluationKind::Evaluation => &self.evaluation,
            EvaluationKind::SelfEvaluation => &self.self_evaluation,
        }
    }
}

/// Phase-1 result handed back to the caller for column mapping.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDiscovery {
    pub session_token: Uuid,
    pub file_columns: Vec<String>,
    pub expected_columns: Vec<String>,
}

/// Orchestrates the upload → map → merge protocol.
///
/// Phase 2 never overwrites an existing grade, wherever it came from, and
/// commits nothing when any row fails validation.
pub struct ImportReconciler {
    sessions: ImportSessionStore,
    columns: ImportGoalColumns,
}

impl ImportReconciler {
    pub fn new(columns: ImportGoalColumns) -> Self {
        Self {
            sessions: ImportSessionStore::new(),
            columns,
        }
    }

    pub fn with_session_store(columns: ImportGoalColumns, sessions: ImportSessionStore) -> Self {
        Self { sessions, columns }
    }

    /// Phase 1: reads only the header row and opens a session that later
    /// resolves back to the same file and format.
    pub async fn discover(
        &self,
        path: impl AsRef<Path>,
        kind: EvaluationKind,
    ) -> DomainResult<ImportDiscovery> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let format =
            SpreadsheetFormat::from_path(&path).ok_or_else(|| DomainError::UnsupportedFormat {
                path: path.display().to_string(),
            })?;

        let reader = spreadsheet::open_reader(format, &path);
        let file_columns = reader.columns().await?;

        let mut expected_columns = vec![CPF_COLUMN.to_string()];
        expected_columns.extend(self.columns.for_kind(kind).iter().cloned());

        let session_token = self.sessions.create(ImportSession {
            path,
            format,
            kind,
            created_at: Utc::now(),
        });
        info!(
            token = %session_token,
            format = ?format,
            columns = file_columns.len(),
            "import session opened"
        );

        Ok(ImportDiscovery {
            session_token,
            file_columns,
            expected_columns,
        })
    }

    /// Phase 2: parses the session's file, remaps columns to goals through
    /// `mapping` (file column → goal), and merges grades into the ledger the
    /// session targets.
    ///
    /// All rows are validated before any write: an unknown CPF or an invalid
    /// grade aborts the call with zero enrollments mutated. Empty cells are
    /// always skipped. Returns the fully parsed, goal-keyed records
    /// regardless of how many cells were actually new.
    pub async fn apply(
        &self,
        class: &mut Class,
        token: Uuid,
        mapping: &HashMap<String, String>,
    ) -> DomainResult<Vec<HashMap<String, String>>> {
        let session = self
            .sessions
            .take(&token)
            .ok_or(DomainError::UnknownSession { token })?;

        let reader = spreadsheet::open_reader(session.format, &session.path);
        let records = reader.process().await?;

        let remapped: Vec<HashMap<String, String>> = records
            .iter()
            .map(|record| {
                record
                    .iter()
                    .filter_map(|(column, value)| {
                        mapping
                            .get(column)
                            .map(|goal| (goal.clone(), value.clone()))
                    })
                    .collect()
            })
            .collect();

        // validate everything up front so a bad row commits nothing
        let mut writes: Vec<(String, String, Grade)> = Vec::new();
        for row in &remapped {
            let cpf = normalize_cpf(row.get(CPF_COLUMN).map(String::as_str).unwrap_or(""));
            let enrollment =
                class
                    .find_enrollment(&cpf)
                    .ok_or_else(|| DomainError::EnrollmentNotFound {
                        cpf: cpf.clone(),
                    })?;

            for (goal, value) in row {
                if goal == CPF_COLUMN {
                    continue;
                }
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                let grade: Grade =
                    value
                        .parse()
                        .map_err(|_| DomainError::InvalidGrade {
                            cpf: cpf.clone(),
                            goal: goal.clone(),
                            value: value.to_string(),
                        })?;
                if enrollment.find_for(session.kind, goal).is_none() {
                    writes.push((cpf.clone(), goal.clone(), grade));
                }
            }
        }

        let mut written = 0usize;
        for (cpf, goal, grade) in writes {
            let Some(enrollment) = class.find_enrollment_mut(&cpf) else {
                continue;
            };
            // first occurrence wins when a file repeats a (cpf, goal) pair
            if enrollment.find_for(session.kind, &goal).is_none() {
                enrollment.add_or_update_for(session.kind, &goal, grade);
                written += 1;
            }
        }

        debug!(rows = remapped.len(), written, "import merge finished");
        Ok(remapped)
    }
}
