//! File loading and merging for tack configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::{default_model, AgentConfig, Config, ProviderConfig, ProviderEntry};

impl Config {
    /// Loads the global config from `~/.config/tack/config.toml`.
    ///
    /// If no config file exists, creates one with sensible defaults
    /// (including `{env:VAR}` placeholders for API keys) and returns it.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let default_toml = format!(
                r#"model = "{}"

[agent]
max_rounds = {}
command_timeout_secs = {}

[provider]

[provider.anthropic]
api_key = "{{env:ANTHROPIC_API_KEY}}"

[provider.openai]
api_key = "{{env:OPENAI_API_KEY}}"

[provider.openrouter]
api_key = "{{env:OPENROUTER_API_KEY}}"

[provider.ollama]
base_url = "http://localhost:11434"
"#,
                default_model(),
                crate::constants::MAX_ROUNDS_DEFAULT,
                crate::constants::COMMAND_TIMEOUT_SECS_DEFAULT,
            );
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &default_toml)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            let config: Config = toml::from_str(&default_toml)
                .with_context(|| "Failed to parse default config".to_string())?;
            return Ok(config);
        }

        Self::load_file(&path)
    }

    /// Look for tack.toml in current dir, then walk up to git root.
    pub(super) fn load_project() -> Result<Option<Config>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                return Self::load_file(&candidate).map(Some);
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config at {:?}", path))
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            model: if project.model != default_model() {
                project.model
            } else {
                global.model
            },
            provider: ProviderConfig {
                openai: merge_entry(global.provider.openai, project.provider.openai),
                anthropic: merge_entry(global.provider.anthropic, project.provider.anthropic),
                ollama: merge_entry(global.provider.ollama, project.provider.ollama),
                openrouter: merge_entry(global.provider.openrouter, project.provider.openrouter),
            },
            system_prompt: project.system_prompt.or(global.system_prompt),
            default_provider: project.default_provider.or(global.default_provider),
            agent: AgentConfig {
                max_tokens: project.agent.max_tokens.or(global.agent.max_tokens),
                max_rounds: project.agent.max_rounds.or(global.agent.max_rounds),
                command_timeout_secs: project
                    .agent
                    .command_timeout_secs
                    .or(global.agent.command_timeout_secs),
            },
        }
    }
}

fn merge_entry(
    global: Option<ProviderEntry>,
    project: Option<ProviderEntry>,
) -> Option<ProviderEntry> {
    match (global, project) {
        (Some(g), Some(p)) => Some(ProviderEntry {
            api_key: p.api_key.or(g.api_key),
            base_url: p.base_url.or(g.base_url),
            model: p.model.or(g.model),
        }),
        (g, p) => p.or(g),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_values_win() {
        let global: Config = toml::from_str(
            r#"
model = "global-model"
default_provider = "anthropic"

[agent]
max_rounds = 10
command_timeout_secs = 30

[provider.anthropic]
api_key = "global-key"
base_url = "https://global.example"
"#,
        )
        .unwrap();
        let project: Config = toml::from_str(
            r#"
model = "project-model"

[agent]
max_rounds = 3

[provider.anthropic]
api_key = "project-key"
"#,
        )
        .unwrap();

        let merged = Config::merge(global, project);
        assert_eq!(merged.model, "project-model");
        assert_eq!(merged.default_provider.as_deref(), Some("anthropic"));
        assert_eq!(merged.agent.max_rounds, Some(3));
        assert_eq!(merged.agent.command_timeout_secs, Some(30));

        let anthropic = merged.provider.anthropic.unwrap();
        assert_eq!(anthropic.api_key.as_deref(), Some("project-key"));
        assert_eq!(anthropic.base_url.as_deref(), Some("https://global.example"));
    }

    #[test]
    fn default_project_model_keeps_global() {
        let global = Config {
            model: "global-model".into(),
            ..Config::default()
        };
        let merged = Config::merge(global, Config::default());
        assert_eq!(merged.model, "global-model");
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }
}
