//! Two-phase spreadsheet import: header discovery, then mapped merge.

pub mod reconciler;
pub mod session;

pub use reconciler::{CPF_COLUMN, ImportDiscovery, ImportGoalColumns, ImportReconciler};
pub use session::{ImportSession, ImportSessionStore};
