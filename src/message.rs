//! Message types for tack's conversation history.
//!
//! A [`Message`] is a [`Role`] plus an ordered list of [`ContentBlock`]s. The
//! assistant's tool calls and the synthetic tool-result messages live in the
//! same history as ordinary text, so call ids stay resolvable across rounds.
//! These are tack's own types; the provider layer converts them to rig-core's
//! message format when a request is sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The role of a message sender in the conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A typed unit within a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text { text: String },
    /// A tool invocation requested by the model.
    ToolUse {
        /// Opaque id, unique within the response that produced it.
        id: String,
        /// Separate correlation id for providers that pair results with calls
        /// by something other than `id` (OpenAI's Responses API).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        call_id: Option<String>,
        /// Name of the tool to invoke.
        name: String,
        /// JSON arguments to pass to the tool.
        input: Value,
    },
    /// The outcome of a tool invocation, correlated by the call's
    /// [`ContentBlock::correlation_id`].
    ToolResult { tool_use_id: String, content: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self::ToolUse {
            id: id.into(),
            call_id: None,
            name: name.into(),
            input,
        }
    }

    /// A tool call whose provider correlates results by `call_id`.
    pub fn tool_use_with_call_id(
        id: impl Into<String>,
        call_id: impl Into<String>,
        name: impl Into<String>,
        input: Value,
    ) -> Self {
        Self::ToolUse {
            id: id.into(),
            call_id: Some(call_id.into()),
            name: name.into(),
            input,
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
        }
    }

    pub fn is_tool_use(&self) -> bool {
        matches!(self, Self::ToolUse { .. })
    }

    /// The id a tool result must carry to answer this call: `call_id` when
    /// the provider sent one, `id` otherwise. `None` for non-call blocks.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::ToolUse { id, call_id, .. } => Some(call_id.as_deref().unwrap_or(id)),
            _ => None,
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// A user message carrying a single text block.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// An assistant message, stored verbatim as the model produced it.
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// The synthetic user message that answers one round of tool calls.
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: results,
        }
    }

    /// Text blocks joined with newlines. Tool blocks are skipped.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Iterates `(correlation id, name, input)` for each tool call, in block
    /// order. The first element is what the matching result must carry.
    pub fn tool_uses(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ToolUse { name, input, .. } => {
                Some((block.correlation_id()?, name.as_str(), input))
            }
            _ => None,
        })
    }

    /// True when every block is a tool result.
    pub fn is_tool_results(&self) -> bool {
        !self.content.is_empty()
            && self
                .content
                .iter()
                .all(|b| matches!(b, ContentBlock::ToolResult { .. }))
    }
}
