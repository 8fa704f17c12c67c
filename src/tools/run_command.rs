//! Shell command tool: runs `sh -c` with a wall-clock bound.

use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use super::{parse_input, Tool, ToolError, ToolResult};

use crate::constants::{COMMAND_MAX_OUTPUT_SIZE, COMMAND_STRIPPED_ENV_VARS, NO_OUTPUT};

/// Tool that executes shell commands in a child process.
///
/// Commands run in the working directory with stdin closed and provider API
/// keys stripped from the environment. A command still running when the
/// timeout expires is killed and reported as timed out.
pub struct RunCommandTool {
    workdir: PathBuf,
    timeout: Duration,
}

impl RunCommandTool {
    pub fn new(workdir: PathBuf, timeout: Duration) -> Self {
        Self { workdir, timeout }
    }
}

#[derive(Deserialize)]
struct RunCommandInput {
    command: String,
}

/// Truncate `output` to at most `COMMAND_MAX_OUTPUT_SIZE` bytes, appending a
/// notice when truncation occurs.
fn cap_output(output: String) -> String {
    if output.len() <= COMMAND_MAX_OUTPUT_SIZE {
        return output;
    }
    // Find a valid UTF-8 boundary at or before the limit.
    let mut end = COMMAND_MAX_OUTPUT_SIZE;
    while end > 0 && !output.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}\n... output truncated at {} bytes",
        &output[..end],
        COMMAND_MAX_OUTPUT_SIZE
    )
}

/// Stdout, then stderr under a marker, then the exit code when non-zero.
fn format_output(stdout: &str, stderr: &str, code: i32) -> String {
    let mut text = stdout.to_string();
    if !stderr.is_empty() {
        text.push_str("\nSTDERR:\n");
        text.push_str(stderr);
    }
    if code != 0 {
        text.push_str(&format!("\nExit code: {}", code));
    }
    if text.is_empty() {
        NO_OUTPUT.to_string()
    } else {
        cap_output(text)
    }
}

#[async_trait::async_trait]
impl Tool for RunCommandTool {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Run a shell command and return its output, stderr, and exit code."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Shell command to run"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError> {
        let input: RunCommandInput = parse_input(self.name(), input)?;
        tracing::debug!(command = %input.command, "running shell command");

        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(&input.command);
        cmd.current_dir(&self.workdir);

        for var in COMMAND_STRIPPED_ENV_VARS {
            cmd.env_remove(var);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // Dropping the wait future on timeout must take the child with it.
        cmd.kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                return Ok(ToolResult::error(format!("Error running command: {}", e)));
            }
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let code = output.status.code().unwrap_or(-1);
                let text = format_output(&stdout, &stderr, code);

                if code != 0 {
                    Ok(ToolResult::error(text))
                } else {
                    Ok(ToolResult::success(text))
                }
            }
            Ok(Err(e)) => Ok(ToolResult::error(format!("Error running command: {}", e))),
            Err(_) => {
                tracing::warn!(
                    command = %input.command,
                    timeout = ?self.timeout,
                    "shell command timed out"
                );
                Ok(ToolResult::error(format!(
                    "Error: command timed out after {} seconds",
                    self.timeout.as_secs_f64()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_output_layout() {
        assert_eq!(format_output("", "", 0), NO_OUTPUT);
        assert_eq!(format_output("hi\n", "", 0), "hi\n");
        assert_eq!(format_output("", "bad\n", 2), "\nSTDERR:\nbad\n\nExit code: 2");
    }

    #[test]
    fn cap_output_truncates_long_text() {
        let long = "x".repeat(COMMAND_MAX_OUTPUT_SIZE + 10);
        let capped = cap_output(long);
        assert!(capped.ends_with(&format!("truncated at {} bytes", COMMAND_MAX_OUTPUT_SIZE)));
        assert!(capped.len() < COMMAND_MAX_OUTPUT_SIZE + 100);
    }
}
