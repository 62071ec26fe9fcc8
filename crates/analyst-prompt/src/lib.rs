//! Prompt template management for stock-analyst
//!
//! This crate provides a small, type-safe system for managing the prompt
//! templates sent to the LLM: Jinja2 variable interpolation and a
//! named, thread-safe registry.
//!
//! # Quick Start
//!
//! ```
//! use analyst_prompt::{JinjaTemplate, PromptRegistry, PromptTemplate};
//! use serde_json::json;
//!
//! let template = JinjaTemplate::new("greeting", "Hello, {{ name }}!").unwrap();
//! assert_eq!(template.render(&json!({ "name": "World" })).unwrap(), "Hello, World!");
//!
//! let registry = PromptRegistry::new();
//! registry.register(JinjaTemplate::new("analyzer", "Analyze {{ symbol }}").unwrap());
//! let prompt = registry.render("analyzer", &json!({ "symbol": "INFY" })).unwrap();
//! assert_eq!(prompt, "Analyze INFY");
//! ```

mod error;
mod jinja;
mod registry;
mod template;

// Re-export core types
pub use error::{PromptError, Result};
pub use jinja::JinjaTemplate;
pub use registry::PromptRegistry;
pub use template::PromptTemplate;
