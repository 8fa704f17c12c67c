//! Output rendering abstraction for tack.
//!
//! Defines the [`Renderer`] trait that decouples turn results from the
//! display layer. [`StdoutRenderer`] prints to the terminal.

use colored::Colorize;
use serde_json::Value;

use crate::agent::{Reply, TurnStop};
use crate::constants::TOOL_PREVIEW_CHARS;
use crate::format;

/// Trait for rendering what happens during a turn.
pub trait Renderer {
    /// Called after each tool call finishes.
    fn render_tool_call(&mut self, name: &str, input: &Value, result: &str);

    /// Called when a turn ends without error.
    fn render_reply(&mut self, reply: &Reply);

    /// Called when a turn fails.
    fn render_error(&mut self, err: &str);
}

/// Renders turn output directly to stdout, errors to stderr.
///
/// Counts tool calls so the reply footer can report them.
#[derive(Default)]
pub struct StdoutRenderer {
    tool_calls: usize,
}

impl StdoutRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for StdoutRenderer {
    fn render_tool_call(&mut self, name: &str, input: &Value, result: &str) {
        self.tool_calls += 1;
        println!("{} {}", format!("[{name}]").yellow().bold(), input.to_string().dimmed());
        println!("{}", format::preview(result, TOOL_PREVIEW_CHARS).dimmed());
    }

    fn render_reply(&mut self, reply: &Reply) {
        if self.tool_calls > 0 {
            println!();
        }
        if !reply.text.is_empty() {
            println!("{}", format::render_markdown_lite(&reply.text));
        }
        match reply.stop {
            TurnStop::Completed => {}
            TurnStop::RoundLimit(limit) => {
                println!();
                println!(
                    "{}",
                    format!("[stopped after {limit} rounds; the model still wanted tools]").yellow()
                );
            }
            TurnStop::Cancelled => {
                println!();
                println!("{}", "[cancelled]".yellow());
            }
        }
        println!();
        println!(
            "{}",
            format!("[{} rounds, {} tool calls]", reply.rounds, self.tool_calls).dimmed()
        );
    }

    fn render_error(&mut self, err: &str) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), err);
    }
}
