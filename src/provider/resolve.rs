//! Model resolution logic for tack.
//!
//! Resolves which provider and model to use based on CLI flags, config file,
//! and hardcoded defaults. Supports `provider/model` shorthand syntax.

use anyhow::Result;

use super::kind::{default_model_for, ProviderKind};
use crate::config::Config;

use crate::constants::DEFAULT_PROVIDER;

/// Resolved provider + model pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub provider: ProviderKind,
    pub model: String,
}

/// Resolve which provider and model to use.
/// Priority: CLI flags > config.toml > defaults.
///
/// Accepts these formats:
///   --model anthropic/claude-sonnet-4-5  (provider/model shorthand, only when --provider is omitted)
///   --provider openrouter --model "org/model-name"  (slash preserved as model name)
///   --provider anthropic --model claude-sonnet-4-5
///   --provider anthropic  (uses provider's default model)
///   (nothing)  (uses config.toml, then hardcoded default)
pub fn resolve_model(
    cli_provider: Option<&str>,
    cli_model: Option<&str>,
    config: &Config,
) -> Result<ModelSelection> {
    if cli_provider.is_none() {
        if let Some((prov, model)) = cli_model.and_then(|m| m.split_once('/')) {
            return Ok(ModelSelection {
                provider: prov.parse()?,
                model: model.to_string(),
            });
        }
    }

    let provider: ProviderKind = cli_provider
        .or(config.provider_name())
        .unwrap_or(DEFAULT_PROVIDER)
        .parse()?;

    // A model configured for the chosen provider beats the global one.
    let model = cli_model
        .map(String::from)
        .or_else(|| config.provider_model(provider))
        .or_else(|| config.model_name())
        .unwrap_or_else(|| default_model_for(&provider).to_string());

    Ok(ModelSelection { provider, model })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_sets_provider_and_model() {
        let sel = resolve_model(None, Some("openai/gpt-4o"), &Config::default()).unwrap();
        assert_eq!(sel.provider, ProviderKind::OpenAI);
        assert_eq!(sel.model, "gpt-4o");
    }

    #[test]
    fn explicit_provider_keeps_slash_in_model() {
        let sel = resolve_model(
            Some("openrouter"),
            Some("meta/llama-3"),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(sel.provider, ProviderKind::OpenRouter);
        assert_eq!(sel.model, "meta/llama-3");
    }

    #[test]
    fn provider_alone_uses_its_default_model() {
        let sel = resolve_model(Some("ollama"), None, &Config::default()).unwrap();
        assert_eq!(sel.model, crate::constants::OLLAMA_DEFAULT_MODEL);
    }

    #[test]
    fn nothing_configured_falls_back_to_defaults() {
        let sel = resolve_model(None, None, &Config::default()).unwrap();
        assert_eq!(sel.provider, ProviderKind::Anthropic);
        assert_eq!(sel.model, crate::constants::DEFAULT_MODEL);
    }

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(resolve_model(Some("nope"), None, &Config::default()).is_err());
    }
}
