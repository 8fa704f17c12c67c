use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use super::{parse_input, resolve_path, Tool, ToolError, ToolResult};

use crate::constants::EMPTY_DIRECTORY;

pub struct ListFilesTool {
    workdir: PathBuf,
}

impl ListFilesTool {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }
}

#[derive(Deserialize)]
struct ListFilesInput {
    #[serde(default = "current_dir")]
    directory: String,
}

fn current_dir() -> String {
    ".".to_string()
}

/// Entry names sorted, with directories suffixed by the path separator.
fn list_entries(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries: Vec<(String, bool)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        // Follows symlinks, so a link to a directory lists as a directory.
        let is_dir = entry.path().is_dir();
        entries.push((name, is_dir));
    }
    entries.sort();
    Ok(entries
        .into_iter()
        .map(|(name, is_dir)| {
            if is_dir {
                format!("{}{}", name, MAIN_SEPARATOR)
            } else {
                name
            }
        })
        .collect())
}

#[async_trait::async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List the files and sub-directories inside a directory."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory to list (defaults to the current directory)"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError> {
        let input: ListFilesInput = parse_input(self.name(), input)?;
        let dir = resolve_path(&self.workdir, &input.directory);

        if !dir.exists() {
            return Ok(ToolResult::error(format!(
                "Error: directory '{}' not found",
                input.directory
            )));
        }
        if !dir.is_dir() {
            return Ok(ToolResult::error(format!(
                "Error: '{}' is not a directory",
                input.directory
            )));
        }

        match list_entries(&dir) {
            Ok(entries) if entries.is_empty() => Ok(ToolResult::success(EMPTY_DIRECTORY.into())),
            Ok(entries) => Ok(ToolResult::success(entries.join("\n"))),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Ok(ToolResult::error(format!(
                "Error: permission denied accessing '{}'",
                input.directory
            ))),
            Err(e) => Ok(ToolResult::error(format!("Error listing files: {}", e))),
        }
    }
}
