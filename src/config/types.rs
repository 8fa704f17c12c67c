//! Struct definitions and serde defaults for tack configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for tack, deserialized from `config.toml`.
///
/// Fields use serde defaults so tack can run with sensible defaults
/// when no config file exists.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Default model identifier (e.g. `"claude-sonnet-4-5"`).
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Default provider name (e.g., "anthropic", "openai").
    #[serde(default)]
    pub default_provider: Option<String>,
    /// System preamble sent with every completion request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: Option<String>,
    /// Orchestration loop and tool limits.
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Returns the default model identifier.
///
/// Used by serde's `#[serde(default)]` attribute during deserialization.
pub(super) fn default_model() -> String {
    crate::constants::DEFAULT_MODEL.to_string()
}

fn default_system_prompt() -> Option<String> {
    Some(crate::constants::DEFAULT_SYSTEM_PROMPT.to_string())
}

/// Provider-specific configuration map.
///
/// Each field corresponds to a supported LLM provider. Only providers
/// the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProviderConfig {
    pub openai: Option<ProviderEntry>,
    pub anthropic: Option<ProviderEntry>,
    pub ollama: Option<ProviderEntry>,
    pub openrouter: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProviderEntry {
    /// API key for authentication. Can also be set via environment variables.
    pub api_key: Option<String>,
    /// Custom base URL for the provider's API (useful for proxies or self-hosted instances).
    pub base_url: Option<String>,
    /// Model identifier to use with this provider, overriding the global default.
    pub model: Option<String>,
}

/// Limits applied to each chat turn.
///
/// Unset values fall back to the defaults in [`crate::constants`].
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgentConfig {
    /// Maximum output tokens per completion request.
    pub max_tokens: Option<u64>,
    /// Maximum completion rounds in one turn before it is cut off.
    pub max_rounds: Option<usize>,
    /// Wall-clock bound for `run_command`, in seconds.
    pub command_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            provider: ProviderConfig::default(),
            system_prompt: default_system_prompt(),
            default_provider: None,
            agent: AgentConfig::default(),
        }
    }
}
