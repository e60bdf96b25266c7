//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use interviewer_core::engine::EngineConfig;
use interviewer_core::gate::GenerationSettings;
use interviewer_core::prompts::{PromptOverride, PromptSet, TemplateId};
use interviewer_core::timing::TimingPolicy;
use interviewer_core::traits::LlmProvider;

use crate::gemini::GeminiProvider;
use crate::mock::MockProvider;

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    /// Offline provider returning a canned verdict.
    Mock {
        #[serde(default)]
        response: Option<String>,
        #[serde(default)]
        delay_ms: u64,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock { response, delay_ms } => f
                .debug_struct("Mock")
                .field("response", response)
                .field("delay_ms", delay_ms)
                .finish(),
        }
    }
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Top-level interviewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewerConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider the evaluators use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model the evaluators use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature for every evaluation request.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Optional system prompt replacing the built-in one.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Max concurrent generation requests across the process.
    #[serde(default = "default_gate_capacity")]
    pub gate_capacity: usize,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub timing: TimingPolicy,
    /// Prompt template overrides keyed by template id.
    #[serde(default)]
    pub prompts: HashMap<TemplateId, PromptOverride>,
    #[serde(default)]
    pub server: ServerSettings,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_temperature() -> f64 {
    0.2
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_gate_capacity() -> usize {
    1
}
fn default_request_timeout() -> u64 {
    60
}

impl Default for InterviewerConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: None,
            gate_capacity: default_gate_capacity(),
            request_timeout_secs: default_request_timeout(),
            timing: TimingPolicy::default(),
            prompts: HashMap::new(),
            server: ServerSettings::default(),
        }
    }
}

impl InterviewerConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.gate_capacity >= 1, "gate_capacity must be at least 1");
        anyhow::ensure!(
            self.request_timeout_secs >= 1,
            "request_timeout_secs must be at least 1"
        );
        anyhow::ensure!(
            (0.0..=2.0).contains(&self.temperature),
            "temperature must be between 0.0 and 2.0"
        );
        anyhow::ensure!(self.max_tokens >= 1, "max_tokens must be at least 1");
        self.timing.validate()?;
        PromptSet::with_overrides(&self.prompts)?;
        Ok(())
    }

    /// Upper bound on one generation request, shared by the gate and the
    /// provider's HTTP client.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the engine configuration this file describes.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        self.validate()?;
        Ok(EngineConfig {
            gate_capacity: self.gate_capacity,
            generation: GenerationSettings {
                model: self.default_model.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                system_prompt: self.system_prompt.clone(),
                timeout: self.request_timeout(),
            },
            timing: self.timing,
            prompts: PromptSet::with_overrides(&self.prompts)?,
        })
    }

    /// Instantiate the provider named by `default_provider`.
    pub fn build_provider(&self) -> Result<Arc<dyn LlmProvider>> {
        let Some(provider_config) = self.providers.get(&self.default_provider) else {
            let mut configured: Vec<&str> = self.providers.keys().map(String::as_str).collect();
            configured.sort_unstable();
            anyhow::bail!(
                "provider '{}' is not configured (configured: [{}]); run `interviewer init` or set its API key in the environment",
                self.default_provider,
                configured.join(", ")
            );
        };
        Ok(Arc::from(create_provider(
            &self.default_provider,
            provider_config,
            self.request_timeout(),
        )?))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again. An unterminated `${` is kept
/// as-is.
fn resolve_env_vars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + 2 + len];
        out.push_str(&rest[..start]);
        out.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    out.push_str(rest);
    out
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Mock { .. } => config.clone(),
    }
}

/// Set the Gemini API key, creating the `gemini` entry if needed.
fn override_gemini_key(config: &mut InterviewerConfig, key: String) {
    let entry = config
        .providers
        .entry("gemini".into())
        .or_insert_with(|| ProviderConfig::Gemini {
            api_key: String::new(),
            base_url: None,
        });
    match entry {
        ProviderConfig::Gemini { api_key, .. } => *api_key = key,
        ProviderConfig::Mock { .. } => {
            tracing::warn!("ignoring API key override: provider 'gemini' is configured as a mock")
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `interviewer.toml` in the current directory
/// 2. `~/.config/interviewer/config.toml`
///
/// The Gemini API key can be overridden with `INTERVIEWER_GEMINI_KEY` (or
/// `GOOGLE_API_KEY`).
pub fn load_config() -> Result<InterviewerConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<InterviewerConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("interviewer.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<InterviewerConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => InterviewerConfig::default(),
    };

    // Apply env var overrides
    let gemini_key =
        std::env::var("INTERVIEWER_GEMINI_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY"));
    if let Ok(key) = gemini_key {
        override_gemini_key(&mut config, key);
    }

    // Resolve env vars in all provider configs
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("interviewer"))
}

/// Create a provider instance from its configuration.
///
/// `request_timeout` bounds each HTTP request the provider makes.
pub fn create_provider(
    name: &str,
    config: &ProviderConfig,
    request_timeout: Duration,
) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            anyhow::ensure!(!api_key.is_empty(), "provider '{name}' has an empty api_key");
            Ok(Box::new(GeminiProvider::new(
                api_key,
                base_url.clone(),
                request_timeout,
            )))
        }
        ProviderConfig::Mock { response, delay_ms } => {
            let provider = match response {
                Some(text) => MockProvider::with_fixed_response(text),
                None => MockProvider::new(HashMap::new()),
            };
            Ok(Box::new(
                provider.with_delay(Duration::from_millis(*delay_ms)),
            ))
        }
    }
}
