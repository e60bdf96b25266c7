//! Bounded admission to the text-generation provider.
//!
//! Every generation call in the process goes through one `GenerationGate`.
//! The gate owns a semaphore sized by `gate_capacity` (1 by default, so at
//! most one request is in flight system-wide) and bounds each call with a
//! timeout. The permit is held only while the provider call runs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::instrument;

use crate::error::{EvalError, ProviderError, Stage};
use crate::traits::{GenerateRequest, LlmProvider};

/// Model parameters applied to every generation request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Model identifier passed to the provider.
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// `None` lets the provider use the default system prompt.
    pub system_prompt: Option<String>,
    /// Upper bound on a single provider call, excluding time spent queued.
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.2,
            max_tokens: 1024,
            system_prompt: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Shared, cloneable handle that serializes access to the provider.
#[derive(Clone)]
pub struct GenerationGate {
    provider: Arc<dyn LlmProvider>,
    permits: Arc<Semaphore>,
    capacity: usize,
    settings: GenerationSettings,
}

impl GenerationGate {
    /// Create a gate admitting at most `capacity` concurrent calls.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(provider: Arc<dyn LlmProvider>, capacity: usize, settings: GenerationSettings) -> Self {
        let capacity = capacity.max(1);
        Self {
            provider,
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            settings,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by an in-flight call.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Send one instruction to the provider and return its text.
    ///
    /// Provider errors, timeouts and blank responses all surface as
    /// `EvalError::GenerationFailure` tagged with `stage`. No retries.
    #[instrument(skip_all, fields(stage = %stage, model = %self.settings.model))]
    pub async fn generate(&self, stage: Stage, prompt: String) -> Result<String, EvalError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| EvalError::generation(stage, anyhow::anyhow!("generation gate closed")))?;

        let request = GenerateRequest {
            model: self.settings.model.clone(),
            prompt,
            system_prompt: self.settings.system_prompt.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let start = Instant::now();
        let response =
            match tokio::time::timeout(self.settings.timeout, self.provider.generate(&request))
                .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    tracing::warn!("{} generation failed: {e:#}", self.provider.name());
                    return Err(EvalError::generation(stage, e));
                }
                Err(_) => {
                    tracing::warn!(
                        "{} generation timed out after {:?}",
                        self.provider.name(),
                        self.settings.timeout
                    );
                    return Err(EvalError::generation(
                        stage,
                        ProviderError::Timeout(self.settings.timeout.as_secs()),
                    ));
                }
            };

        if response.content.trim().is_empty() {
            return Err(EvalError::generation(stage, ProviderError::EmptyResponse));
        }

        tracing::debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            total_tokens = response.token_usage.total_tokens,
            "generation complete"
        );
        Ok(response.content)
    }
}
