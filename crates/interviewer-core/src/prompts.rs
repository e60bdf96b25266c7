//! Versioned instruction templates.
//!
//! Templates are data, not code: each has an id, a version, and text with
//! `{name}` placeholders. The built-in set can be overridden from the
//! config file, and every template is checked for the placeholders its
//! stage fills in.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Identifies which pipeline step a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Structural,
    Coherence,
    Synthesis,
}

impl TemplateId {
    /// Placeholders the template must contain.
    pub fn required_placeholders(&self) -> &'static [&'static str] {
        match self {
            TemplateId::Structural | TemplateId::Coherence => &["answer"],
            TemplateId::Synthesis => &["structural", "coherence", "timing"],
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateId::Structural => write!(f, "structural"),
            TemplateId::Coherence => write!(f, "coherence"),
            TemplateId::Synthesis => write!(f, "synthesis"),
        }
    }
}

/// A single instruction template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: TemplateId,
    pub version: u32,
    pub text: String,
}

impl PromptTemplate {
    pub fn new(id: TemplateId, version: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            version,
            text: text.into(),
        }
    }

    /// Check that every required placeholder appears in the text.
    pub fn validate(&self) -> Result<()> {
        for name in self.id.required_placeholders() {
            anyhow::ensure!(
                self.text.contains(&format!("{{{name}}}")),
                "prompt template '{}' v{} is missing the {{{name}}} placeholder",
                self.id,
                self.version
            );
        }
        Ok(())
    }

    /// Substitute `{name}` placeholders in a single pass.
    ///
    /// Substituted values are never re-scanned, so braces inside a
    /// candidate answer are copied through untouched. Unknown placeholders
    /// are left as written.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.text.len() + 256);
        let mut rest = self.text.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let replacement = after.find('}').and_then(|close| {
                let name = &after[..close];
                vars.iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value, close))
            });
            match replacement {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Replacement text for one template, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOverride {
    /// Defaults to one past the built-in version.
    #[serde(default)]
    pub version: Option<u32>,
    pub text: String,
}

/// The three templates the pipeline uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub structural: PromptTemplate,
    pub coherence: PromptTemplate,
    pub synthesis: PromptTemplate,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            structural: PromptTemplate::new(TemplateId::Structural, 1, STRUCTURAL_V1),
            coherence: PromptTemplate::new(TemplateId::Coherence, 1, COHERENCE_V1),
            synthesis: PromptTemplate::new(TemplateId::Synthesis, 1, SYNTHESIS_V1),
        }
    }
}

impl PromptSet {
    /// Built-in templates with any configured overrides applied and validated.
    pub fn with_overrides(overrides: &HashMap<TemplateId, PromptOverride>) -> Result<Self> {
        let mut set = Self::default();
        for (id, replacement) in overrides {
            let slot = set.get_mut(*id);
            let version = replacement.version.unwrap_or(slot.version + 1);
            *slot = PromptTemplate::new(*id, version, replacement.text.clone());
        }
        set.validate()?;
        Ok(set)
    }

    pub fn get(&self, id: TemplateId) -> &PromptTemplate {
        match id {
            TemplateId::Structural => &self.structural,
            TemplateId::Coherence => &self.coherence,
            TemplateId::Synthesis => &self.synthesis,
        }
    }

    fn get_mut(&mut self, id: TemplateId) -> &mut PromptTemplate {
        match id {
            TemplateId::Structural => &mut self.structural,
            TemplateId::Coherence => &mut self.coherence,
            TemplateId::Synthesis => &mut self.synthesis,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.structural.validate()?;
        self.coherence.validate()?;
        self.synthesis.validate()
    }
}

const STRUCTURAL_V1: &str = "Evaluate the answer below with the STAR technique (Situation, Task, Action, Result) and give it a score out of 10.
Focus on how clearly each component comes through.
- Score: [score]/10
- Evaluation: [evaluation]
Answer: {answer}";

const COHERENCE_V1: &str = "Evaluate the logic and clarity of the answer below and give it a score out of 10.
- Does the answer follow a logical flow?
- Are its claims communicated clearly?
- Score: [score]/10
- Evaluation: [evaluation]
Answer: {answer}";

const SYNTHESIS_V1: &str = "Below are several evaluation results for one interview answer. Combine them into a single final interview evaluation report.
The report must include the scores and the reasoning behind them.

<evaluation results>
- STAR evaluation: {structural}
- Logic evaluation: {coherence}
- Speaking time evaluation: {timing}

<final report>
";
