//! Write-file tool: writes content to a file, creating parent directories as needed.

use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use super::{parse_input, resolve_path, Tool, ToolError, ToolResult};

/// Tool that writes string content to a file.
///
/// Missing parent directories are created first. An existing file is
/// replaced.
pub struct WriteFileTool {
    /// Relative paths are resolved against this directory.
    workdir: PathBuf,
}

impl WriteFileTool {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }
}

#[derive(Deserialize)]
struct WriteFileInput {
    path: String,
    content: String,
}

fn write_with_parents(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

#[async_trait::async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file, creating the file and any missing parent directories."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path to write"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write to the file"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError> {
        let input: WriteFileInput = parse_input(self.name(), input)?;
        let path = resolve_path(&self.workdir, &input.path);

        match write_with_parents(&path, &input.content) {
            Ok(()) => Ok(ToolResult::success(format!(
                "Successfully wrote {} bytes to '{}'",
                input.content.len(),
                input.path
            ))),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Ok(ToolResult::error(format!(
                "Error: permission denied writing to '{}'",
                input.path
            ))),
            Err(e) => Ok(ToolResult::error(format!("Error writing file: {}", e))),
        }
    }
}
