//! Route handlers.
//!
//! Each handler is a thin shim over one `InterviewService` operation.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use interviewer_core::SessionId;

use crate::error::ApiError;
use crate::models::{
    EndInterviewRequest, EndInterviewResponse, EvaluateAnswerRequest, EvaluateAnswerResponse,
    HealthResponse, StartInterviewResponse,
};
use crate::server::AppState;

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::MalformedSession(raw.to_string()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Open a new interview session.
pub async fn start_interview(State(state): State<AppState>) -> Json<StartInterviewResponse> {
    let session_id = state.service.start_session();
    Json(StartInterviewResponse {
        session_id,
        message: "Interview simulation started.".to_string(),
    })
}

/// Evaluate one answer and append it to the session.
pub async fn evaluate_answer(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateAnswerRequest>, JsonRejection>,
) -> Result<Json<EvaluateAnswerResponse>, ApiError> {
    let request = body(payload)?;
    let session_id = parse_session_id(&request.session_id)?;

    let report = state
        .service
        .submit_answer(
            &session_id,
            &request.question,
            &request.answer,
            request.time_in_seconds,
        )
        .await?;

    Ok(Json(EvaluateAnswerResponse {
        report_for_current_answer: report,
    }))
}

/// Close the session and return every evaluation it accumulated.
pub async fn end_interview(
    State(state): State<AppState>,
    payload: Result<Json<EndInterviewRequest>, JsonRejection>,
) -> Result<Json<EndInterviewResponse>, ApiError> {
    let request = body(payload)?;
    let session_id = parse_session_id(&request.session_id)?;
    let interview_log = state.service.end_session(&session_id)?;
    Ok(Json(EndInterviewResponse { interview_log }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let gate = state.service.engine().gate();
    Json(HealthResponse {
        status: "ok".to_string(),
        active_sessions: state.service.sessions().len(),
        provider: gate.provider_name().to_string(),
        gate_capacity: gate.capacity(),
    })
}
