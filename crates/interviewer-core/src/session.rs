//! In-memory session store.
//!
//! One mutex guards the whole map. It is only ever held for a single map
//! operation and never across an await point, so start, record and end
//! are each atomic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::error::EvalError;
use crate::model::{EvaluationRecord, SessionId};

#[derive(Debug)]
struct Session {
    started_at: DateTime<Utc>,
    records: Vec<EvaluationRecord>,
}

/// Process-wide mapping from session id to its accumulated records.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Each mutation completes under one lock, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a new, empty session.
    pub fn start(&self) -> SessionId {
        let mut sessions = self.lock();
        let mut id = SessionId::new();
        while sessions.contains_key(&id) {
            id = SessionId::new();
        }
        sessions.insert(
            id,
            Session {
                started_at: Utc::now(),
                records: Vec::new(),
            },
        );
        tracing::info!(session_id = %id, "session started");
        id
    }

    /// Append a record to a live session.
    pub fn record(&self, id: &SessionId, record: EvaluationRecord) -> Result<(), EvalError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(id)
            .ok_or(EvalError::UnknownSession(*id))?;
        session.records.push(record);
        tracing::debug!(session_id = %id, records = session.records.len(), "record appended");
        Ok(())
    }

    /// Remove a session and return its records in submission order.
    pub fn end(&self, id: &SessionId) -> Result<Vec<EvaluationRecord>, EvalError> {
        let session = self
            .lock()
            .remove(id)
            .ok_or(EvalError::UnknownSession(*id))?;
        let duration = Utc::now() - session.started_at;
        tracing::info!(
            session_id = %id,
            records = session.records.len(),
            duration_secs = duration.num_seconds(),
            "session ended"
        );
        Ok(session.records)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.lock().contains_key(id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
