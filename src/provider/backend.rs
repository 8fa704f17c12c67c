//! The completion boundary the agent loop talks to.
//!
//! [`CompletionBackend`] is the only thing the loop knows about the remote
//! model: one request in, one response out. [`Provider`](super::Provider)
//! implements it over rig-core; tests implement it with scripted responses.

use anyhow::Result;

use crate::message::{ContentBlock, Message};
use crate::tools::ToolDefinition;

/// Everything one completion round sends to the model.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    /// System preamble.
    pub system: &'a str,
    /// Full conversation history, oldest first. Never empty.
    pub messages: &'a [Message],
    pub tools: &'a [ToolDefinition],
    pub max_tokens: u64,
}

/// Why the model stopped producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The model concluded its reply.
    EndTurn,
    /// The model wants the tool calls in this response executed.
    ToolUse,
}

/// The model's reply to a [`CompletionRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Text and tool-use blocks in the order the model produced them.
    pub content: Vec<ContentBlock>,
    pub stop: StopReason,
}

/// A remote model that can answer completion requests.
///
/// Implementations may block for an unbounded time. Errors (network, auth,
/// rate limits) are returned as-is; the caller decides whether to retry.
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<CompletionResponse>;
}
