//! Evaluation orchestrator.
//!
//! Runs the timing, structural and coherence evaluators, then the report
//! synthesizer, and assembles one [`EvaluationRecord`]. The two LLM-backed
//! evaluators run concurrently; the gate decides how many of their
//! requests actually reach the provider at once.

use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use crate::error::EvalError;
use crate::evaluators::{AnswerEvaluator, ReportSynthesizer};
use crate::gate::{GenerationGate, GenerationSettings};
use crate::model::{EvaluationRecord, SubEvaluations};
use crate::prompts::PromptSet;
use crate::timing::TimingPolicy;
use crate::traits::LlmProvider;

/// Configuration for the evaluation engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum concurrent generation calls across the process.
    pub gate_capacity: usize,
    pub generation: GenerationSettings,
    pub timing: TimingPolicy,
    pub prompts: PromptSet,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gate_capacity: 1,
            generation: GenerationSettings::default(),
            timing: TimingPolicy::default(),
            prompts: PromptSet::default(),
        }
    }
}

/// The central evaluation engine.
pub struct EvaluationEngine {
    gate: GenerationGate,
    structural: AnswerEvaluator,
    coherence: AnswerEvaluator,
    synthesizer: ReportSynthesizer,
    timing: TimingPolicy,
}

impl EvaluationEngine {
    pub fn new(provider: Arc<dyn LlmProvider>, config: EngineConfig) -> Self {
        let gate = GenerationGate::new(provider, config.gate_capacity, config.generation);
        Self {
            gate,
            structural: AnswerEvaluator::structural(&config.prompts),
            coherence: AnswerEvaluator::coherence(&config.prompts),
            synthesizer: ReportSynthesizer::new(&config.prompts),
            timing: config.timing,
        }
    }

    pub fn gate(&self) -> &GenerationGate {
        &self.gate
    }

    /// Evaluate one answer end to end.
    ///
    /// Any failure aborts the whole call; no partial record is produced.
    #[instrument(skip_all, fields(elapsed_seconds = elapsed_seconds))]
    pub async fn evaluate_full_answer(
        &self,
        question: &str,
        answer: &str,
        elapsed_seconds: i64,
    ) -> Result<EvaluationRecord, EvalError> {
        let elapsed_seconds = validate_submission(question, answer, elapsed_seconds)?;

        let timing = self.timing.evaluate(elapsed_seconds);
        let (structural, coherence) = futures::try_join!(
            self.structural.evaluate(&self.gate, answer),
            self.coherence.evaluate(&self.gate, answer)
        )?;

        let final_report = self
            .synthesizer
            .synthesize(&self.gate, &structural, &coherence, &timing)
            .await?;

        tracing::info!(
            timing_score = timing.score,
            report_len = final_report.len(),
            "answer evaluated"
        );

        Ok(EvaluationRecord {
            question: question.to_string(),
            answer: answer.to_string(),
            elapsed_seconds,
            evaluations: SubEvaluations {
                structural,
                coherence,
                timing,
            },
            final_report,
            evaluated_at: Utc::now(),
        })
    }
}

/// Reject submissions before any evaluator runs.
fn validate_submission(question: &str, answer: &str, elapsed_seconds: i64) -> Result<u64, EvalError> {
    if question.trim().is_empty() {
        return Err(EvalError::InvalidInput("question must not be empty".into()));
    }
    if answer.trim().is_empty() {
        return Err(EvalError::InvalidInput("answer must not be empty".into()));
    }
    u64::try_from(elapsed_seconds).map_err(|_| {
        EvalError::InvalidInput(format!(
            "elapsed_seconds must not be negative, got {elapsed_seconds}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_submission_passes() {
        assert_eq!(validate_submission("Q", "A", 0).unwrap(), 0);
        assert_eq!(validate_submission("Q", "A", 100).unwrap(), 100);
    }

    #[test]
    fn negative_elapsed_is_rejected() {
        let err = validate_submission("Q", "A", -1).unwrap_err();
        assert!(matches!(err, EvalError::InvalidInput(_)));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(matches!(
            validate_submission("Q", "   ", 100),
            Err(EvalError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_submission("", "A", 100),
            Err(EvalError::InvalidInput(_))
        ));
    }
}
