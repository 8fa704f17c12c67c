//! Environment variable substitution, API key resolution, and typed
//! accessors that apply defaults to unset values.

use std::time::Duration;

use super::types::{Config, ProviderEntry};
use crate::provider::ProviderKind;

use crate::constants::{
    COMMAND_TIMEOUT_SECS_DEFAULT, DEFAULT_SYSTEM_PROMPT, MAX_ROUNDS_DEFAULT, MAX_TOKENS,
};

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        self.model = Self::resolve_str(&self.model);
        if let Some(ref mut sp) = self.system_prompt {
            *sp = Self::resolve_str(sp);
        }
        if let Some(ref mut dp) = self.default_provider {
            *dp = Self::resolve_str(dp);
        }
        Self::resolve_provider_entry(&mut self.provider.openai);
        Self::resolve_provider_entry(&mut self.provider.anthropic);
        Self::resolve_provider_entry(&mut self.provider.ollama);
        Self::resolve_provider_entry(&mut self.provider.openrouter);
    }

    /// Resolves `{env:VAR}` patterns in a single provider entry's string fields.
    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            for field in [&mut e.api_key, &mut e.base_url, &mut e.model] {
                if let Some(value) = field {
                    *value = Self::resolve_str(value);
                }
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    ///
    /// Substituted values are copied as-is, never rescanned.
    fn resolve_str(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(start) = rest.find("{env:") {
            let Some(end) = rest[start..].find('}') else {
                break;
            };
            let var_name = &rest[start + 5..start + end];
            result.push_str(&rest[..start]);
            result.push_str(&std::env::var(var_name).unwrap_or_default());
            rest = &rest[start + end + 1..];
        }
        result.push_str(rest);
        result
    }

    fn entry(&self, provider: &str) -> Option<&ProviderEntry> {
        match provider {
            "openai" => self.provider.openai.as_ref(),
            "anthropic" => self.provider.anthropic.as_ref(),
            "ollama" => self.provider.ollama.as_ref(),
            "openrouter" => self.provider.openrouter.as_ref(),
            _ => None,
        }
    }

    /// Resolve API key for a provider: env var first, then config value.
    ///
    /// Empty values count as unset, so an unexpanded `{env:VAR}` placeholder
    /// never becomes a blank key.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        // Check env var first (OPENAI_API_KEY, ANTHROPIC_API_KEY, etc.)
        let env_key = format!("{}_API_KEY", provider.to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.is_empty() {
                return Some(val);
            }
        }

        self.entry(provider)
            .and_then(|e| e.api_key.clone())
            .filter(|key| !key.is_empty())
    }

    /// Get the configured default provider name, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Model set in the `[provider.<name>]` section, if any.
    pub fn provider_model(&self, provider: ProviderKind) -> Option<String> {
        self.entry(provider.as_str())
            .and_then(|e| e.model.clone())
            .filter(|m| !m.is_empty())
    }

    /// Get the model name from config, stripping provider prefix if present.
    /// Returns None if the model is the compile-time default (meaning user hasn't configured it).
    pub fn model_name(&self) -> Option<String> {
        let m = &self.model;
        if m == crate::constants::DEFAULT_MODEL {
            return None; // treat default as "not configured"
        }
        // If model contains slash, extract just the model part
        if let Some((_prov, model)) = m.split_once('/') {
            Some(model.to_string())
        } else {
            Some(m.to_string())
        }
    }

    /// System preamble for completion requests.
    pub fn system_prompt_text(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// Output token limit per completion request.
    pub fn max_tokens(&self) -> u64 {
        self.agent.max_tokens.unwrap_or(MAX_TOKENS)
    }

    /// Completion rounds allowed per turn. Never less than one.
    pub fn max_rounds(&self) -> usize {
        self.agent.max_rounds.unwrap_or(MAX_ROUNDS_DEFAULT).max(1)
    }

    /// Wall-clock bound for `run_command`.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(
            self.agent
                .command_timeout_secs
                .unwrap_or(COMMAND_TIMEOUT_SECS_DEFAULT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;

    #[test]
    fn substitutes_env_placeholders() {
        std::env::set_var("TACK_TEST_SUBST_VALUE", "secret");
        assert_eq!(
            Config::resolve_str("key-{env:TACK_TEST_SUBST_VALUE}-end"),
            "key-secret-end"
        );
        assert_eq!(Config::resolve_str("{env:TACK_TEST_SUBST_MISSING}"), "");
        assert_eq!(Config::resolve_str("{env:unterminated"), "{env:unterminated");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        std::env::set_var("TACK_TEST_SELF_REF", "{env:TACK_TEST_SELF_REF}");
        assert_eq!(
            Config::resolve_str("a{env:TACK_TEST_SELF_REF}b"),
            "a{env:TACK_TEST_SELF_REF}b"
        );
    }

    #[test]
    fn provider_model_reads_matching_section() {
        let config: Config = toml::from_str(
            r#"
[provider.openai]
model = "gpt-4.1"
"#,
        )
        .unwrap();
        assert_eq!(
            config.provider_model(ProviderKind::OpenAI).as_deref(),
            Some("gpt-4.1")
        );
        assert_eq!(config.provider_model(ProviderKind::Anthropic), None);
    }

    #[test]
    fn agent_limits_fall_back_to_defaults() {
        let config = Config::default();
        assert_eq!(config.max_tokens(), MAX_TOKENS);
        assert_eq!(config.max_rounds(), MAX_ROUNDS_DEFAULT);
        assert_eq!(
            config.command_timeout(),
            Duration::from_secs(COMMAND_TIMEOUT_SECS_DEFAULT)
        );
    }

    #[test]
    fn zero_rounds_is_clamped_to_one() {
        let config = Config {
            agent: AgentConfig {
                max_rounds: Some(0),
                ..AgentConfig::default()
            },
            ..Config::default()
        };
        assert_eq!(config.max_rounds(), 1);
    }

    #[test]
    fn configured_model_strips_provider_prefix() {
        let config = Config {
            model: "openai/gpt-4o".into(),
            ..Config::default()
        };
        assert_eq!(config.model_name().as_deref(), Some("gpt-4o"));
        assert_eq!(Config::default().model_name(), None);
    }
}
