//! interviewer-core: answer-evaluation pipeline and session lifecycle.
//!
//! This crate defines the data model, the provider trait, the evaluation
//! steps and their orchestration, and the in-memory session store that the
//! server and CLI build on.

pub mod engine;
pub mod error;
pub mod evaluators;
pub mod gate;
pub mod model;
pub mod prompts;
pub mod service;
pub mod session;
pub mod timing;
pub mod traits;

pub use engine::{EngineConfig, EvaluationEngine};
pub use error::{EvalError, ProviderError, Stage};
pub use model::{EvaluationRecord, SessionId, SubEvaluations, TimingLabel, TimingResult};
pub use service::InterviewService;
pub use timing::{evaluate_timing, TimingPolicy};
