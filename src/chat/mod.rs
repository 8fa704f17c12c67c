//! Interactive chat REPL for tack.
//!
//! Provides a multi-turn conversation loop using [`rustyline`] for readline
//! support (history, line editing). Each line becomes one [`Agent`] turn;
//! the agent keeps the conversation, so the model sees all prior context.

mod commands;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::agent::{Agent, AgentError, Reply};
use crate::config::Config;
use crate::output::{Renderer, StdoutRenderer};
use crate::provider::CompletionBackend;

/// Runs the interactive chat REPL.
///
/// # Readline behavior
///
/// - **Ctrl+C** at the prompt: cancels current input, stays in REPL
/// - **Ctrl+C** during a turn: stops the turn at the next round boundary
/// - **Ctrl+D**: exits cleanly with "goodbye."
/// - Readline history is persisted to `~/.cache/tack/chat_history.txt`
pub async fn run_chat<B: CompletionBackend>(agent: &mut Agent<B>) -> Result<()> {
    println!(
        "{} [model: {}] [tools: {}] (Ctrl+D to exit, /help for commands)",
        "tack chat".bold().cyan(),
        agent.settings().model.yellow(),
        agent.tools().names().join(", ").dimmed(),
    );
    println!();

    // Set up readline with persistent history
    let mut rl = DefaultEditor::new()?;
    let history_path = Config::cache_dir()?.join(crate::constants::HISTORY_FILENAME);
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    loop {
        let readline = rl.readline(&format!("{} ", ">".green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                if line.starts_with('/') {
                    match commands::handle_slash_command(&line, agent) {
                        commands::CommandAction::Continue => continue,
                        commands::CommandAction::Exit => {
                            println!("{}", "goodbye.".dimmed());
                            break;
                        }
                        commands::CommandAction::Unknown(cmd) => {
                            println!("{} Unknown command: {}", "?".yellow(), cmd);
                            continue;
                        }
                    }
                }

                let _ = rl.add_history_entry(&line);
                println!();

                let mut renderer = StdoutRenderer::new();
                match run_turn(agent, &line, &mut renderer).await {
                    Ok(reply) => renderer.render_reply(&reply),
                    // The agent keeps the history it had, so the user can retry.
                    Err(e) => renderer.render_error(&e.to_string()),
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    // Save readline history
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

/// Runs one turn, echoing tool calls as they finish.
///
/// Ctrl+C while the turn runs fires the cancellation token instead of
/// killing the process.
pub(crate) async fn run_turn<B: CompletionBackend>(
    agent: &mut Agent<B>,
    line: &str,
    renderer: &mut dyn Renderer,
) -> Result<Reply, AgentError> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupt received, cancelling turn");
                cancel.cancel();
            }
        })
    };

    let mut on_tool_call =
        |name: &str, input: &Value, result: &str| renderer.render_tool_call(name, input, result);
    let result = agent
        .chat_cancellable(line, Some(&mut on_tool_call), &cancel)
        .await;

    watcher.abort();
    result
}
