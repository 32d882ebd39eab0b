//! Session store bridging import phase 1 and phase 2.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::enrollment::EvaluationKind;
use crate::spreadsheet::SpreadsheetFormat;

/// Everything phase 2 needs to resume: the uploaded file, its detected
/// format, and the ledger the import targets.
#[derive(Debug, Clone)]
pub struct ImportSession {
    pub path: PathBuf,
    pub format: SpreadsheetFormat,
    pub kind: EvaluationKind,
    pub created_at: DateTime<Utc>,
}

/// Opaque-token store for import sessions.
///
/// Tokens are single-use: phase 2 consumes the session. Entries additionally
/// expire after `ttl` (30 minutes by default) and are purged on access, so
/// an abandoned phase 1 does not pin its temporary file forever.
pub struct ImportSessionStore {
    sessions: Mutex<HashMap<Uuid, ImportSession>>,
    ttl: Duration,
}

impl ImportSessionStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(30))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Registers a session and returns its token. The token's identity is
    /// independent of the file path it resolves to.
    pub fn create(&self, session: ImportSession) -> Uuid {
        let token = Uuid::new_v4();
        let mut sessions = self.sessions.lock().expect("session store poisoned");
        Self::purge_expired(&mut sessions, self.ttl);
        sessions.insert(token, session);
        token
    }

    /// Consumes and returns the session for `token`, if it is still live.
    pub fn take(&self, token: &Uuid) -> Option<ImportSession> {
        let mut sessions = self.sessions.lock().expect("session store poisoned");
        Self::purge_expired(&mut sessions, self.ttl);
        sessions.remove(token)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_expired(sessions: &mut HashMap<Uuid, ImportSession>, ttl: Duration) {
        let now = Utc::now();
        sessions.retain(|_, s| now - s.created_at < ttl);
    }
}

impl Default for ImportSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ImportSession {
        ImportSession {
            path: PathBuf::from("/tmp/grades.csv"),
            format: SpreadsheetFormat::Csv,
            kind: EvaluationKind::Evaluation,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_tokens_are_single_use() {
        let store = ImportSessionStore::new();
        let token = store.create(session());

        assert!(store.take(&token).is_some());
        assert!(store.take(&token).is_none());
    }

    #[test]
    fn test_unknown_token_resolves_to_nothing() {
        let store = ImportSessionStore::new();
        assert!(store.take(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_expired_sessions_are_purged() {
        let store = ImportSessionStore::with_ttl(Duration::minutes(30));
        let mut stale = session();
        stale.created_at = Utc::now() - Duration::minutes(31);
        let token = store.create(stale);

        assert!(store.take(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_session_resolves_to_original_file_and_format() {
        let store = ImportSessionStore::new();
        let token = store.create(session());

        let resumed = store.take(&token).unwrap();
        assert_eq!(resumed.path, PathBuf::from("/tmp/grades.csv"));
        assert_eq!(resumed.format, SpreadsheetFormat::Csv);
        assert_eq!(resumed.kind, EvaluationKind::Evaluation);
    }
}
