//! Request and response bodies.

use serde::{Deserialize, Serialize};

use interviewer_core::{EvaluationRecord, SessionId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartInterviewResponse {
    pub session_id: SessionId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateAnswerRequest {
    pub session_id: String,
    pub question: String,
    pub answer: String,
    /// Speaking time measured by the client.
    pub time_in_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateAnswerResponse {
    pub report_for_current_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndInterviewRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndInterviewResponse {
    pub interview_log: Vec<EvaluationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
    pub provider: String,
    pub gate_capacity: usize,
}
