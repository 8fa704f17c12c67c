//! Terminal formatting for conversation messages and model replies.

use colored::Colorize;

use crate::message::{ContentBlock, Message, Role};

/// Format a message for terminal display with role label and colors.
///
/// Tool calls and tool results are shown one per line, with results cut
/// down to a short preview.
pub fn format_message(msg: &Message) -> String {
    let label = match msg.role {
        Role::User if msg.is_tool_results() => format!("{}", "tools:".yellow()),
        Role::User => format!("{}", "you:".green().bold()),
        Role::Assistant => format!("{}", "tack:".cyan().bold()),
    };

    let body: Vec<String> = msg
        .content
        .iter()
        .map(|block| match block {
            ContentBlock::Text { text } => match msg.role {
                Role::User => text.clone(),
                Role::Assistant => render_markdown_lite(text),
            },
            ContentBlock::ToolUse { name, input, .. } => {
                format!("{} {}", format!("[{name}]").yellow(), input).dimmed().to_string()
            }
            ContentBlock::ToolResult { content, .. } => {
                preview(content, crate::constants::TOOL_PREVIEW_CHARS)
                    .dimmed()
                    .to_string()
            }
        })
        .collect();

    format!("{}\n{}", label, body.join("\n"))
}

/// First `max` characters of `text`, with an ellipsis when anything was cut.
pub fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Minimal markdown renderer for terminal output.
/// Not a full parser. Handles bold, inline code, and fenced code blocks.
pub fn render_markdown_lite(text: &str) -> String {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if let Some(lang) = line.strip_prefix("```") {
            in_code_block = !in_code_block;
            if in_code_block && !lang.is_empty() {
                lines.push(format!("  {}", lang.dimmed()));
            } else if !in_code_block {
                lines.push(String::new());
            }
            continue;
        }

        if in_code_block {
            lines.push(format!("  {}", line.dimmed()));
        } else {
            lines.push(render_inline(line));
        }
    }

    lines.join("\n")
}

/// Handle **bold** and `inline code` within a single line.
fn render_inline(line: &str) -> String {
    let mut result = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                result.push_str(&after[..end].bold().to_string());
                rest = &after[end + 2..];
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                result.push_str(&after[..end].dimmed().to_string());
                rest = &after[end + 1..];
                continue;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            result.push(c);
        }
        rest = chars.as_str();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_cuts_on_char_boundary() {
        assert_eq!(preview("héllo", 2), "hé…");
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("exact", 5), "exact");
    }

    #[test]
    fn plain_text_passes_through() {
        colored::control::set_override(false);
        assert_eq!(render_markdown_lite("a\nb"), "a\nb");
        assert_eq!(render_markdown_lite("use `x` and **y**"), "use x and y");
        assert_eq!(render_markdown_lite("unclosed **bold"), "unclosed **bold");
    }

    #[test]
    fn code_fences_are_indented() {
        colored::control::set_override(false);
        assert_eq!(
            render_markdown_lite("```rust\nfn main() {}\n```"),
            "  rust\n  fn main() {}\n"
        );
    }
}
