//! Slash command handlers for the chat REPL.
//!
//! Dispatches `/history`, `/clear`, `/help`, `/exit` and `/quit`.
//! Returns a [`CommandAction`] so the REPL loop can decide how to proceed.

use colored::Colorize;

use crate::agent::Agent;
use crate::format;
use crate::provider::CompletionBackend;

/// A recognized slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlashCommand {
    History,
    Clear,
    Help,
    Exit,
}

impl SlashCommand {
    /// Parses a trimmed input line. Returns `None` for unknown commands.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        match input {
            "/history" => Some(Self::History),
            "/clear" => Some(Self::Clear),
            "/help" => Some(Self::Help),
            "/exit" | "/quit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Action returned by slash command handling.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CommandAction {
    /// Command was handled successfully; continue the REPL loop.
    Continue,
    /// Leave the REPL.
    Exit,
    /// Unknown command was entered.
    Unknown(String),
}

/// Dispatch and handle a slash command.
pub(crate) fn handle_slash_command<B: CompletionBackend>(
    input: &str,
    agent: &mut Agent<B>,
) -> CommandAction {
    let Some(command) = SlashCommand::parse(input) else {
        return CommandAction::Unknown(input.to_string());
    };

    match command {
        SlashCommand::History => {
            if agent.conversation().is_empty() {
                println!("{}", "No messages yet.".dimmed());
            }
            for msg in agent.conversation().snapshot() {
                println!("{}", format::format_message(msg));
                println!();
            }
        }
        SlashCommand::Clear => {
            agent.clear();
            println!("{}", "History cleared.".dimmed());
        }
        SlashCommand::Help => {
            println!("{}", "Commands:".bold());
            println!("  {} - show conversation history", "/history".cyan());
            println!("  {} - clear conversation", "/clear".cyan());
            println!("  {} - show this help", "/help".cyan());
            println!("  {} - exit (or Ctrl+D)", "/exit".cyan());
            println!("  {} - cancel the running turn", "Ctrl+C".cyan());
        }
        SlashCommand::Exit => return CommandAction::Exit,
    }
    CommandAction::Continue
}
