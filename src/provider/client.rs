//! rig-core backed implementation of [`CompletionBackend`].
//!
//! Contains the [`Provider`] struct which wraps rig-core provider clients
//! behind enum dispatch, keeping provider-specific details out of the agent
//! loop. Supports Anthropic, OpenAI, OpenRouter, and Ollama.
//!
//! Each call issues exactly one completion request. Tool execution stays in
//! the agent loop, so tools are only sent to the model as definitions.

use anyhow::{anyhow, Context, Result};
use rig::client::CompletionClient;
use rig::completion::{CompletionModel, ToolDefinition as RigToolDefinition};
use rig::message::{
    AssistantContent, Message as RigMessage, Text, ToolCall as RigToolCall, ToolFunction,
    ToolResultContent, UserContent,
};
use rig::providers::{anthropic, openai, openrouter};
use rig::OneOrMany;

use super::backend::{CompletionBackend, CompletionRequest, CompletionResponse, StopReason};
use super::kind::ProviderKind;
use crate::config::Config;
use crate::message::{ContentBlock, Message, Role};

/// Internal enum wrapping provider-specific clients.
enum ClientKind {
    Anthropic(anthropic::Client),
    OpenAI(openai::Client),
    OpenRouter(openrouter::Client),
    Ollama(openai::Client),
}

/// A configured LLM provider ready to handle completion requests.
///
/// The model is chosen per request, so one `Provider` serves any model its
/// backend offers.
pub struct Provider {
    client: ClientKind,
}

/// Dispatches an operation across provider-specific clients.
///
/// Matches on [`ClientKind`] and executes the same block for each variant,
/// letting the compiler monomorphize per provider.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::Anthropic($client) => $body,
            ClientKind::OpenAI($client) => $body,
            ClientKind::OpenRouter($client) => $body,
            ClientKind::Ollama($client) => $body,
        }
    };
}

impl Provider {
    /// Creates a new [`Provider`] from the loaded application config.
    ///
    /// Resolves the API key through tack's config precedence chain
    /// (env var → config file → substitution) and builds the appropriate
    /// provider client.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is found for the selected provider
    /// or if client construction fails.
    pub fn from_config(config: &Config, kind: ProviderKind) -> Result<Self> {
        let client = match kind {
            ProviderKind::Anthropic => {
                let api_key = config
                    .resolve_api_key("anthropic")
                    .context("No API key found for Anthropic. Set ANTHROPIC_API_KEY or configure it in config.toml")?;
                let client = anthropic::Client::new(&api_key)
                    .context("Failed to create Anthropic client")?;
                ClientKind::Anthropic(client)
            }
            ProviderKind::OpenAI => {
                let api_key = config
                    .resolve_api_key("openai")
                    .context("No API key found for OpenAI. Set OPENAI_API_KEY or configure it in config.toml")?;
                let client =
                    openai::Client::new(&api_key).context("Failed to create OpenAI client")?;
                ClientKind::OpenAI(client)
            }
            ProviderKind::OpenRouter => {
                let api_key = config
                    .resolve_api_key("openrouter")
                    .context("No API key found for OpenRouter. Set OPENROUTER_API_KEY or configure it in config.toml")?;
                let client = openrouter::Client::new(&api_key)
                    .context("Failed to create OpenRouter client")?;
                ClientKind::OpenRouter(client)
            }
            ProviderKind::Ollama => {
                let base_url = config
                    .provider
                    .ollama
                    .as_ref()
                    .and_then(|o| o.base_url.as_deref())
                    .unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);
                let client = openai::Client::builder()
                    .api_key("ollama")
                    .base_url(format!("{}/v1", base_url))
                    .build()
                    .context("Failed to create Ollama client")?;
                ClientKind::Ollama(client)
            }
        };
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl CompletionBackend for Provider {
    /// Sends the conversation to the model and returns its next message.
    ///
    /// The last history message becomes the rig-core prompt and everything
    /// before it the chat history. rig-core does not surface the provider's
    /// stop reason, so a response carrying tool calls is treated as
    /// [`StopReason::ToolUse`] and anything else as [`StopReason::EndTurn`].
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<CompletionResponse> {
        let (last, earlier) = request
            .messages
            .split_last()
            .ok_or_else(|| anyhow!("completion request has no messages"))?;
        let prompt = to_rig_message(last);
        let history: Vec<RigMessage> = earlier.iter().map(to_rig_message).collect();
        let tools: Vec<RigToolDefinition> = request
            .tools
            .iter()
            .map(|t| RigToolDefinition {
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: t.parameters.clone(),
            })
            .collect();

        tracing::debug!(
            model = request.model,
            messages = request.messages.len(),
            tools = tools.len(),
            "sending completion request"
        );

        let choice = dispatch!(self, |client| {
            client
                .completion_model(request.model)
                .completion_request(prompt)
                .preamble(request.system.to_string())
                .messages(history)
                .tools(tools)
                .max_tokens(request.max_tokens)
                .send()
                .await
                .context("LLM API call failed")?
                .choice
        });

        Ok(from_rig_choice(choice))
    }
}

/// Converts the model's returned content into tack blocks.
///
/// Reasoning and other non-text, non-tool content is dropped.
fn from_rig_choice(choice: OneOrMany<AssistantContent>) -> CompletionResponse {
    let content: Vec<ContentBlock> = choice
        .into_iter()
        .filter_map(|item| match item {
            AssistantContent::Text(Text { text }) => Some(ContentBlock::text(text)),
            AssistantContent::ToolCall(call) => Some(match call.call_id {
                Some(call_id) => ContentBlock::tool_use_with_call_id(
                    call.id,
                    call_id,
                    call.function.name,
                    call.function.arguments,
                ),
                None => {
                    ContentBlock::tool_use(call.id, call.function.name, call.function.arguments)
                }
            }),
            _ => None,
        })
        .collect();

    let stop = if content.iter().any(ContentBlock::is_tool_use) {
        StopReason::ToolUse
    } else {
        StopReason::EndTurn
    };

    CompletionResponse { content, stop }
}

/// Converts a tack [`Message`] to a rig-core [`RigMessage`].
///
/// - **User** text and tool results → `RigMessage::User` content items
/// - **Assistant** text and tool calls → `RigMessage::Assistant` content items
///
/// Tool results carry the call's correlation id as both `id` and `call_id`,
/// and calls keep the provider's `call_id` when there was one, so providers
/// keyed on either field can pair them.
///
/// rig-core requires at least one content item, so an empty message becomes
/// a single empty text item.
fn to_rig_message(msg: &Message) -> RigMessage {
    match msg.role {
        Role::User => {
            let items: Vec<UserContent> = msg
                .content
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(UserContent::text(text.clone())),
                    ContentBlock::ToolResult {
                        tool_use_id,
                        content,
                    } => Some(UserContent::tool_result_with_call_id(
                        tool_use_id.clone(),
                        tool_use_id.clone(),
                        OneOrMany::one(ToolResultContent::text(content.clone())),
                    )),
                    ContentBlock::ToolUse { .. } => None,
                })
                .collect();
            RigMessage::User {
                content: OneOrMany::many(items)
                    .unwrap_or_else(|_| OneOrMany::one(UserContent::text(""))),
            }
        }
        Role::Assistant => {
            let items: Vec<AssistantContent> = msg
                .content
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(AssistantContent::text(text.clone())),
                    ContentBlock::ToolUse {
                        id,
                        call_id,
                        name,
                        input,
                    } => {
                        let call = RigToolCall::new(
                            id.clone(),
                            ToolFunction::new(name.clone(), input.clone()),
                        );
                        let call = match call_id {
                            Some(call_id) => call.with_call_id(call_id.clone()),
                            None => call,
                        };
                        Some(AssistantContent::ToolCall(call))
                    }
                    ContentBlock::ToolResult { .. } => None,
                })
                .collect();
            RigMessage::Assistant {
                id: None,
                content: OneOrMany::many(items)
                    .unwrap_or_else(|_| OneOrMany::one(AssistantContent::text(""))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_calls_mark_response_as_tool_use() {
        let choice = OneOrMany::many(vec![
            AssistantContent::text("looking"),
            AssistantContent::ToolCall(RigToolCall::new(
                "call_1".to_string(),
                ToolFunction::new("list_files".to_string(), json!({})),
            )),
        ])
        .unwrap();

        let response = from_rig_choice(choice);
        assert_eq!(response.stop, StopReason::ToolUse);
        assert_eq!(
            response.content,
            vec![
                ContentBlock::text("looking"),
                ContentBlock::tool_use("call_1", "list_files", json!({})),
            ]
        );
    }

    #[test]
    fn responses_api_call_ids_survive_history_conversion() {
        use rig::providers::openai::responses_api::InputItem;

        let choice = OneOrMany::one(AssistantContent::tool_call_with_call_id(
            "fc_1",
            "call_1".to_string(),
            "list_files",
            json!({}),
        ));
        let assistant = Message::assistant(from_rig_choice(choice).content);
        let results = Message::tool_results(
            assistant
                .tool_uses()
                .map(|(id, _, _)| ContentBlock::tool_result(id, "a.txt"))
                .collect(),
        );
        assert_eq!(results.content, vec![ContentBlock::tool_result("call_1", "a.txt")]);

        match to_rig_message(&assistant) {
            RigMessage::Assistant { content, .. } => match content.first() {
                AssistantContent::ToolCall(call) => {
                    assert_eq!(call.id, "fc_1");
                    assert_eq!(call.call_id.as_deref(), Some("call_1"));
                }
                other => panic!("expected tool call, got {other:?}"),
            },
            other => panic!("expected assistant message, got {other:?}"),
        }
        match to_rig_message(&results) {
            RigMessage::User { content } => match content.first() {
                UserContent::ToolResult(result) => {
                    assert_eq!(result.id, "call_1");
                    assert_eq!(result.call_id.as_deref(), Some("call_1"));
                }
                other => panic!("expected tool result, got {other:?}"),
            },
            other => panic!("expected user message, got {other:?}"),
        }

        let converted: Result<Vec<InputItem>, _> = to_rig_message(&assistant).try_into();
        assert!(converted.is_ok(), "{:?}", converted.err());
        let converted: Result<Vec<InputItem>, _> = to_rig_message(&results).try_into();
        assert!(converted.is_ok(), "{:?}", converted.err());
    }

    #[test]
    fn anthropic_style_calls_correlate_by_id() {
        let assistant = Message::assistant(vec![ContentBlock::tool_use(
            "toolu_1",
            "read_file",
            json!({"path": "a"}),
        )]);
        match to_rig_message(&assistant) {
            RigMessage::Assistant { content, .. } => match content.first() {
                AssistantContent::ToolCall(call) => {
                    assert_eq!(call.id, "toolu_1");
                    assert_eq!(call.call_id, None);
                }
                other => panic!("expected tool call, got {other:?}"),
            },
            other => panic!("expected assistant message, got {other:?}"),
        }

        let results = Message::tool_results(vec![ContentBlock::tool_result("toolu_1", "x")]);
        match to_rig_message(&results) {
            RigMessage::User { content } => match content.first() {
                UserContent::ToolResult(result) => assert_eq!(result.id, "toolu_1"),
                other => panic!("expected tool result, got {other:?}"),
            },
            other => panic!("expected user message, got {other:?}"),
        }
    }

    #[test]
    fn text_only_response_ends_turn() {
        let response = from_rig_choice(OneOrMany::one(AssistantContent::text("done")));
        assert_eq!(response.stop, StopReason::EndTurn);
        assert_eq!(response.content, vec![ContentBlock::text("done")]);
    }
}
