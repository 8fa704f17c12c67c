//! Centralized constants for tack.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "tack";

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "TACK_LOG";

/// Tracing filter used when `TACK_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default LLM model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-6";

/// Maximum output tokens for each completion request.
pub const MAX_TOKENS: u64 = 4096;

/// Default system preamble sent with every completion request.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are tack, a coding assistant running in the user's terminal. \
You can read and write files, list directories, and run shell commands \
through the provided tools. Be concise and practical.";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "tack.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

/// Default LLM model identifier for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Default LLM model identifier for OpenRouter.
pub const DEFAULT_OPENROUTER_MODEL: &str = "arcee-ai/trinity-large-preview:free";

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default LLM model identifier for Ollama.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3";

// --- Provider defaults ---

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "anthropic";

// --- Agent loop ---

/// Default cap on completion rounds within one turn.
pub const MAX_ROUNDS_DEFAULT: usize = 25;

// --- Tool limits ---

/// Default wall-clock bound for `run_command`, in seconds.
pub const COMMAND_TIMEOUT_SECS_DEFAULT: u64 = 30;

/// Maximum bytes of combined command output returned to the model.
pub const COMMAND_MAX_OUTPUT_SIZE: usize = 100 * 1024;

/// Environment variables removed from the shell tool's child processes.
pub const COMMAND_STRIPPED_ENV_VARS: &[&str] = &[
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
    "OPENROUTER_API_KEY",
];

/// Byte threshold for binary file detection (check first N bytes for null).
pub const BINARY_DETECTION_BYTES: usize = 8192;

/// Sentinel returned by `list_files` for a directory with no entries.
pub const EMPTY_DIRECTORY: &str = "(empty directory)";

/// Result text for a command that produced neither stdout nor stderr.
pub const NO_OUTPUT: &str = "(no output)";

/// Characters of a tool result echoed back to the operator.
pub const TOOL_PREVIEW_CHARS: usize = 200;
