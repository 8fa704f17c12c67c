//! Command-line interface definition and dispatch for tack.
//!
//! Uses [`clap`] for argument parsing with derive macros. Each subcommand is
//! routed to its handler. Running `tack` with no subcommand starts a chat.

use crate::agent::{Agent, AgentSettings};
use crate::output::{Renderer, StdoutRenderer};
use crate::{chat, config, provider, tools::ToolRegistry};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

/// Top-level CLI structure for tack.
#[derive(Parser)]
#[command(
    name = "tack",
    version,
    about = "A terminal assistant that can read, write and run things"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the tack CLI.
///
/// The `///` doc comments on variants double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-shot question
    Ask {
        /// The question to ask
        prompt: Vec<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Provider to use (anthropic, openai, openrouter, ollama)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Start an interactive chat session
    Chat {
        /// Provider to use (anthropic, openai, openrouter, ollama)
        #[arg(short, long)]
        provider: Option<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the config path and the effective settings
    Show,
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Chat {
        provider: None,
        model: None,
    }) {
        Commands::Ask {
            prompt,
            model,
            provider: provider_name,
        } => {
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                anyhow::bail!("No prompt provided. Usage: tack ask \"your question here\"");
            }

            let config = config::Config::load()?;
            let mut agent = build_agent(&config, provider_name.as_deref(), model.as_deref())?;

            println!(
                "{} [model: {}]",
                "tack".bold().cyan(),
                agent.settings().model.yellow(),
            );
            println!();
            println!("{} {}", ">".green().bold(), prompt);
            println!();

            let mut renderer = StdoutRenderer::new();
            let reply = chat::run_turn(&mut agent, &prompt, &mut renderer).await?;
            renderer.render_reply(&reply);
            Ok(())
        }
        Commands::Chat {
            provider: provider_name,
            model,
        } => {
            let config = config::Config::load()?;
            let mut agent = build_agent(&config, provider_name.as_deref(), model.as_deref())?;
            chat::run_chat(&mut agent).await
        }
        Commands::Config { action } => {
            let config = config::Config::load()?;
            match action {
                ConfigAction::Show => {
                    let path = config::Config::config_path()?;
                    println!("{} {}", "Config path:".bold(), path.display());
                    println!();
                    let toml_str = toml::to_string_pretty(&config)?;
                    println!("{}", toml_str);
                }
            }
            Ok(())
        }
    }
}

/// Resolves the provider and model, then wires an [`Agent`] with the
/// built-in tools rooted at the current directory.
fn build_agent(
    config: &config::Config,
    provider_name: Option<&str>,
    model: Option<&str>,
) -> Result<Agent<provider::Provider>> {
    let selection = provider::resolve_model(provider_name, model, config)?;
    tracing::info!(provider = %selection.provider, model = %selection.model, "starting agent");

    let backend = provider::Provider::from_config(config, selection.provider)?;
    let workdir = std::env::current_dir().context("Failed to read current directory")?;
    let tools = ToolRegistry::with_builtins(workdir, config.command_timeout());
    let settings = AgentSettings::from_config(config, selection.model);

    Ok(Agent::new(backend, tools, settings))
}
