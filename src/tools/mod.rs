pub mod list_files;
pub mod read_file;
pub mod run_command;
pub mod write_file;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

use list_files::ListFilesTool;
use read_file::ReadFileTool;
use run_command::RunCommandTool;
use write_file::WriteFileTool;

/// The result of executing a tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: String) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(content: String) -> Self {
        Self {
            content,
            is_error: true,
        }
    }
}

/// A tool call the registry refused to run.
///
/// These never escape [`ToolRegistry::execute`]; they are rendered into an
/// error [`ToolResult`] so the model can see what went wrong and retry.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
    #[error("invalid input for '{tool}': {reason}")]
    InvalidInput { tool: String, reason: String },
}

/// Definition sent to the LLM so it knows what tools are available.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

/// Every tool implements this trait.
///
/// `execute` only fails when the input cannot be decoded. Filesystem and
/// process failures are reported as error [`ToolResult`]s.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the LLM uses to call this tool.
    fn name(&self) -> &str;

    /// Human-readable description for the LLM.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn schema(&self) -> Value;

    /// Execute the tool with the given JSON input.
    async fn execute(&self, input: Value) -> Result<ToolResult, ToolError>;
}

/// Decodes a tool's JSON input into its typed form.
pub(crate) fn parse_input<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidInput {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// Resolves `path` against `workdir` unless it is already absolute.
pub(crate) fn resolve_path(workdir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workdir.join(path)
    }
}

/// Checks `input` against the object schema a tool declares.
///
/// Only the parts of JSON Schema the built-in tools use are enforced: the
/// input must be an object, every `required` property must be present, and
/// properties declared as `"type": "string"` must hold strings.
fn validate_input(tool: &str, schema: &Value, input: &Value) -> Result<(), ToolError> {
    let invalid = |reason: String| ToolError::InvalidInput {
        tool: tool.to_string(),
        reason,
    };

    let fields = input
        .as_object()
        .ok_or_else(|| invalid(format!("expected a JSON object, got {input}")))?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !fields.contains_key(name) {
                return Err(invalid(format!("missing required field '{name}'")));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, value) in fields {
            let declared = properties
                .get(name)
                .and_then(|p| p.get("type"))
                .and_then(Value::as_str);
            if declared == Some("string") && !value.is_string() {
                return Err(invalid(format!("field '{name}' must be a string")));
            }
        }
    }

    Ok(())
}

/// Holds all registered tools and dispatches calls by name.
///
/// Built once at startup; the set of tools never changes during a session.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Called during startup.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Produce definitions for the LLM (sent in every API request).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }

    /// Look up a tool by name, validate the input, and execute it.
    ///
    /// Always yields a result: unknown names and malformed inputs come back
    /// as error text rather than as a Rust error.
    pub async fn execute(&self, name: &str, input: Value) -> ToolResult {
        match self.dispatch(name, input).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "rejected tool call");
                ToolResult::error(format!("Error: {e}"))
            }
        }
    }

    async fn dispatch(&self, name: &str, input: Value) -> Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        validate_input(name, &tool.schema(), &input)?;
        tool.execute(input).await
    }

    /// Names of registered tools, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// How many tools are registered.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a registry with all built-in tools.
    ///
    /// Relative paths given to the tools resolve against `workdir`, which is
    /// also where shell commands run.
    pub fn with_builtins(workdir: PathBuf, command_timeout: Duration) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ReadFileTool::new(workdir.clone())));
        registry.register(Box::new(WriteFileTool::new(workdir.clone())));
        registry.register(Box::new(RunCommandTool::new(workdir.clone(), command_timeout)));
        registry.register(Box::new(ListFilesTool::new(workdir)));
        registry
    }
}

#[cfg(test)]
mod tests;
