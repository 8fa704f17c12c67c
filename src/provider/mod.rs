//! LLM provider abstraction for tack.
//!
//! Defines the [`CompletionBackend`] boundary used by the agent loop and a
//! rig-core backed [`Provider`] that implements it for Anthropic, OpenAI,
//! OpenRouter, and Ollama (local) via [`ProviderKind`].

mod backend;
mod client;
mod kind;
mod resolve;

pub use backend::{CompletionBackend, CompletionRequest, CompletionResponse, StopReason};
pub use client::Provider;
pub use kind::{default_model_for, ProviderKind};
pub use resolve::{resolve_model, ModelSelection};
