//! The turn-taking loop between the model and tack's tools.
//!
//! [`Agent::chat`] appends the user's message, then alternates completion
//! requests and tool dispatch until the model stops asking for tools. Every
//! assistant message and every batch of tool results lands in the
//! [`Conversation`] before the next request, so the model always sees the
//! full exchange.

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::conversation::Conversation;
use crate::message::{ContentBlock, Message};
use crate::provider::{CompletionBackend, CompletionRequest, StopReason};
use crate::tools::{ToolDefinition, ToolRegistry};

/// Observer called once per executed tool call with `(name, input, result)`.
pub type ToolCallObserver<'a> = &'a mut dyn FnMut(&str, &Value, &str);

/// Fixed parameters for every completion request an [`Agent`] issues.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u64,
    /// Completion rounds allowed per turn. Values below one are treated as one.
    pub max_rounds: usize,
}

impl AgentSettings {
    /// Settings for `model` with the limits and preamble from `config`.
    pub fn from_config(config: &Config, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: config.system_prompt_text().to_string(),
            max_tokens: config.max_tokens(),
            max_rounds: config.max_rounds(),
        }
    }
}

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStop {
    /// The model finished without requesting more tools.
    Completed,
    /// The turn used all of its rounds while the model still wanted tools.
    RoundLimit(usize),
    /// The caller's cancellation token fired.
    Cancelled,
}

/// Result of one [`Agent::chat`] turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Text blocks of the last completed round, joined with newlines.
    pub text: String,
    pub stop: TurnStop,
    /// Completion requests that returned a response during this turn.
    pub rounds: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The completion service could not produce a response.
    #[error("completion request failed: {0:#}")]
    Completion(anyhow::Error),
}

/// Owns one conversation and drives it against a [`CompletionBackend`].
///
/// All mutation goes through `&mut self`, so a conversation has exactly one
/// writer and at most one turn in flight.
pub struct Agent<B> {
    backend: B,
    tools: ToolRegistry,
    conversation: Conversation,
    settings: AgentSettings,
}

impl<B: CompletionBackend> Agent<B> {
    pub fn new(backend: B, tools: ToolRegistry, settings: AgentSettings) -> Self {
        Self {
            backend,
            tools,
            conversation: Conversation::new(),
            settings,
        }
    }

    /// Runs one turn to completion.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Completion`] if a completion request fails. The
    /// conversation keeps every message appended before the failure.
    pub async fn chat(
        &mut self,
        user_message: &str,
        on_tool_call: Option<ToolCallObserver<'_>>,
    ) -> Result<Reply, AgentError> {
        self.chat_cancellable(user_message, on_tool_call, &CancellationToken::new())
            .await
    }

    /// Like [`Agent::chat`], but stops early once `cancel` fires.
    ///
    /// The token is checked before each completion request and raced against
    /// the request itself. A running tool is never interrupted, so every
    /// recorded tool call has its result in the history.
    pub async fn chat_cancellable(
        &mut self,
        user_message: &str,
        mut on_tool_call: Option<ToolCallObserver<'_>>,
        cancel: &CancellationToken,
    ) -> Result<Reply, AgentError> {
        self.conversation.append(Message::user(user_message));

        let definitions: Vec<ToolDefinition> = self.tools.definitions();
        let max_rounds = self.settings.max_rounds.max(1);
        let mut rounds = 0;
        let mut text = String::new();

        loop {
            if cancel.is_cancelled() {
                tracing::info!(rounds, "turn cancelled");
                return Ok(Reply { text, stop: TurnStop::Cancelled, rounds });
            }
            if rounds == max_rounds {
                tracing::warn!(max_rounds, "turn reached round limit");
                return Ok(Reply {
                    text,
                    stop: TurnStop::RoundLimit(max_rounds),
                    rounds,
                });
            }

            let request = CompletionRequest {
                model: &self.settings.model,
                system: &self.settings.system_prompt,
                messages: self.conversation.snapshot(),
                tools: &definitions,
                max_tokens: self.settings.max_tokens,
            };
            tracing::debug!(
                round = rounds + 1,
                messages = request.messages.len(),
                "requesting completion"
            );

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(rounds, "turn cancelled while awaiting completion");
                    return Ok(Reply { text, stop: TurnStop::Cancelled, rounds });
                }
                result = self.backend.complete(request) => match result {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::warn!(error = %e, "completion request failed");
                        return Err(AgentError::Completion(e));
                    }
                },
            };
            rounds += 1;

            let assistant = Message::assistant(response.content);
            let calls: Vec<(String, String, Value)> = assistant
                .tool_uses()
                .map(|(id, name, input)| (id.to_string(), name.to_string(), input.clone()))
                .collect();
            text = assistant.text();
            self.conversation.append(assistant);

            if response.stop == StopReason::EndTurn || calls.is_empty() {
                tracing::debug!(rounds, "turn completed");
                return Ok(Reply { text, stop: TurnStop::Completed, rounds });
            }

            let mut results = Vec::with_capacity(calls.len());
            for (id, name, input) in calls {
                let result = self.tools.execute(&name, input.clone()).await;
                tracing::info!(
                    tool = %name,
                    id = %id,
                    is_error = result.is_error,
                    bytes = result.content.len(),
                    "tool call finished"
                );
                if let Some(observer) = on_tool_call.as_deref_mut() {
                    observer(&name, &input, &result.content);
                }
                results.push(ContentBlock::tool_result(id, result.content));
            }
            self.conversation.append(Message::tool_results(results));
        }
    }

    /// Drops the whole conversation. Tools and settings are kept.
    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
