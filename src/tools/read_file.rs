use serde::Deserialize;
use serde_json::{json, Value};
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{parse_input, resolve_path, Tool, ToolError, ToolResult};

use crate::constants::BINARY_DETECTION_BYTES;

pub struct ReadFileTool {
    /// Relative paths are resolved against this directory.
    workdir: PathBuf,
}

impl ReadFileTool {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }
}

#[derive(Deserialize)]
struct ReadFileInput {
    path: String,
}

#[async_trait::async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the full text contents of a file."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path to read"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError> {
        let input: ReadFileInput = parse_input(self.name(), input)?;
        let path = resolve_path(&self.workdir, &input.path);

        let content = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let text = match e.kind() {
                    ErrorKind::NotFound => format!("Error: file '{}' not found", input.path),
                    ErrorKind::PermissionDenied => {
                        format!("Error: permission denied reading '{}'", input.path)
                    }
                    _ => format!("Error reading file: {}", e),
                };
                return Ok(ToolResult::error(text));
            }
        };

        // Check for binary content (null bytes in the first few KB)
        let check_len = content.len().min(BINARY_DETECTION_BYTES);
        if content[..check_len].contains(&0) {
            return Ok(ToolResult::error(format!(
                "Error: '{}' appears to be a binary file",
                input.path
            )));
        }

        match String::from_utf8(content) {
            Ok(text) => Ok(ToolResult::success(text)),
            Err(_) => Ok(ToolResult::error(
                "Error reading file: contents are not valid UTF-8".into(),
            )),
        }
    }
}
