//! LLM provider abstraction layer for stock-analyst
//!
//! This crate provides provider-agnostic abstractions for sending a prompt to a
//! Large Language Model and reading back its text. It includes:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - The Anthropic Messages API provider

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
