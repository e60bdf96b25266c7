//! Error types for the evaluation pipeline.
//!
//! `ProviderError` describes failures talking to a text-generation backend.
//! It lives in `interviewer-core` so the generation gate can downcast and
//! classify provider errors without string matching. `EvalError` is the
//! terminal error every pipeline and session operation returns.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::SessionId;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The provider answered, but with no usable text.
    #[error("provider returned an empty response")]
    EmptyResponse,
}

/// The pipeline step that issued a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Structural,
    Coherence,
    Synthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Structural => write!(f, "structural"),
            Stage::Coherence => write!(f, "coherence"),
            Stage::Synthesis => write!(f, "synthesis"),
        }
    }
}

/// Errors returned by the evaluation pipeline and the session store.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The generation capability errored, timed out, or returned unusable output.
    #[error("{stage} evaluation failed: {source:#}")]
    GenerationFailure {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },

    /// The session identifier does not exist (never created, or already ended).
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    /// The submission was rejected before any evaluator ran.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EvalError {
    pub(crate) fn generation(stage: Stage, source: impl Into<anyhow::Error>) -> Self {
        EvalError::GenerationFailure {
            stage,
            source: source.into(),
        }
    }

    /// `true` for caller misuse (`UnknownSession`, `InvalidInput`), `false`
    /// for service-side failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EvalError::UnknownSession(_) | EvalError::InvalidInput(_)
        )
    }

    /// The provider error behind a `GenerationFailure`, if there is one.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            EvalError::GenerationFailure { source, .. } => source.downcast_ref::<ProviderError>(),
            _ => None,
        }
    }

    /// A message safe to show end users.
    ///
    /// Client errors are reported verbatim. Generation failures name the
    /// stage but never include provider-specific error text.
    pub fn public_message(&self) -> String {
        match self {
            EvalError::GenerationFailure { stage, .. } => {
                format!("the evaluation service could not complete the {stage} step, please retry")
            }
            other => other.to_string(),
        }
    }
}
