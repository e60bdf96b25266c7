//! Core data model types for interviewer.
//!
//! These are the records the pipeline produces and the session store
//! accumulates. Verdict texts are opaque: the pipeline never parses scores
//! out of them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of an interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Allocate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Qualitative pacing label attached to a timing score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingLabel {
    #[serde(rename = "appropriate pacing")]
    AppropriatePacing,
    #[serde(rename = "pacing outside optimal range")]
    OutsideOptimalRange,
}

impl TimingLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimingLabel::AppropriatePacing => "appropriate pacing",
            TimingLabel::OutsideOptimalRange => "pacing outside optimal range",
        }
    }
}

impl fmt::Display for TimingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the timing evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingResult {
    /// Score in `0..=10`.
    pub score: u8,
    pub label: TimingLabel,
}

impl fmt::Display for TimingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10 - {}", self.score, self.label)
    }
}

/// The three sub-evaluations that feed the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEvaluations {
    /// STAR-rubric verdict text.
    pub structural: String,
    /// Logic and clarity verdict text.
    pub coherence: String,
    pub timing: TimingResult,
}

/// The stored outcome of one question/answer submission.
///
/// Only constructed once every step of the pipeline has succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub question: String,
    pub answer: String,
    pub elapsed_seconds: u64,
    pub evaluations: SubEvaluations,
    /// Synthesized narrative report.
    pub final_report: String,
    pub evaluated_at: DateTime<Utc>,
}
