//! The operations the request layer calls.

use std::sync::Arc;

use tracing::instrument;

use crate::engine::{EngineConfig, EvaluationEngine};
use crate::error::EvalError;
use crate::model::{EvaluationRecord, SessionId};
use crate::session::SessionStore;
use crate::traits::LlmProvider;

/// Session lifecycle plus the evaluation pipeline.
pub struct InterviewService {
    engine: EvaluationEngine,
    sessions: SessionStore,
}

impl InterviewService {
    pub fn new(engine: EvaluationEngine) -> Self {
        Self {
            engine,
            sessions: SessionStore::new(),
        }
    }

    pub fn from_provider(provider: Arc<dyn LlmProvider>, config: EngineConfig) -> Self {
        Self::new(EvaluationEngine::new(provider, config))
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn start_session(&self) -> SessionId {
        self.sessions.start()
    }

    /// Evaluate one answer and append it to the session.
    ///
    /// Returns only the synthesized report. Unknown sessions are rejected
    /// before any generation request is made. If the session ends while the
    /// pipeline is running, the finished record is discarded and
    /// `UnknownSession` is returned.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn submit_answer(
        &self,
        session_id: &SessionId,
        question: &str,
        answer: &str,
        elapsed_seconds: i64,
    ) -> Result<String, EvalError> {
        if !self.sessions.contains(session_id) {
            return Err(EvalError::UnknownSession(*session_id));
        }

        let record = self
            .engine
            .evaluate_full_answer(question, answer, elapsed_seconds)
            .await
            .inspect_err(|e| tracing::error!("evaluation failed: {e:#}"))?;

        let report = record.final_report.clone();
        self.sessions.record(session_id, record)?;
        Ok(report)
    }

    /// Close the session and return its transcript.
    pub fn end_session(&self, session_id: &SessionId) -> Result<Vec<EvaluationRecord>, EvalError> {
        self.sessions.end(session_id)
    }
}
