//! tack: a terminal assistant that lets a language model read and write
//! files, list directories and run shell commands on the user's behalf.
//!
//! The [`agent::Agent`] owns a [`conversation::Conversation`] and drives it
//! against any [`provider::CompletionBackend`], dispatching the model's tool
//! calls through a [`tools::ToolRegistry`] until the model produces a reply.

pub mod agent;
pub mod chat;
pub mod cli;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod format;
pub mod message;
pub mod output;
pub mod provider;
pub mod tools;
