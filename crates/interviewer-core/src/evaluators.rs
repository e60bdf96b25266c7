//! The LLM-backed evaluation steps.
//!
//! Structural and coherence evaluators each send the candidate answer
//! through one template. The report synthesizer embeds the three verdicts
//! in a final instruction. All of them return the provider's text as-is.

use crate::error::{EvalError, Stage};
use crate::gate::GenerationGate;
use crate::model::TimingResult;
use crate::prompts::{PromptSet, PromptTemplate};

/// Scores the candidate answer against one rubric.
#[derive(Debug, Clone)]
pub struct AnswerEvaluator {
    stage: Stage,
    template: PromptTemplate,
}

impl AnswerEvaluator {
    /// STAR-rubric evaluator (Situation, Task, Action, Result).
    pub fn structural(prompts: &PromptSet) -> Self {
        Self {
            stage: Stage::Structural,
            template: prompts.structural.clone(),
        }
    }

    /// Logical flow and clarity evaluator.
    pub fn coherence(prompts: &PromptSet) -> Self {
        Self {
            stage: Stage::Coherence,
            template: prompts.coherence.clone(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn render(&self, answer: &str) -> String {
        self.template.render(&[("answer", answer)])
    }

    pub async fn evaluate(&self, gate: &GenerationGate, answer: &str) -> Result<String, EvalError> {
        tracing::debug!(
            "{} evaluation started (template v{})",
            self.stage,
            self.template.version
        );
        gate.generate(self.stage, self.render(answer)).await
    }
}

/// Composes the sub-evaluations into the final report.
#[derive(Debug, Clone)]
pub struct ReportSynthesizer {
    template: PromptTemplate,
}

impl ReportSynthesizer {
    pub fn new(prompts: &PromptSet) -> Self {
        Self {
            template: prompts.synthesis.clone(),
        }
    }

    pub fn render(&self, structural: &str, coherence: &str, timing: &TimingResult) -> String {
        let timing = timing.to_string();
        self.template.render(&[
            ("structural", structural),
            ("coherence", coherence),
            ("timing", &timing),
        ])
    }

    pub async fn synthesize(
        &self,
        gate: &GenerationGate,
        structural: &str,
        coherence: &str,
        timing: &TimingResult,
    ) -> Result<String, EvalError> {
        tracing::debug!(
            "report synthesis started (template v{})",
            self.template.version
        );
        gate.generate(Stage::Synthesis, self.render(structural, coherence, timing))
            .await
    }
}
