//! Core prompt template trait
//!
//! This module defines the [`PromptTemplate`] trait that all template implementations must follow.

use crate::Result;

/// Core trait for prompt templates
///
/// This trait is dyn-compatible, using `serde_json::Value` for variables instead of generics,
/// so templates of different kinds can live side by side in a
/// [`PromptRegistry`](crate::PromptRegistry).
pub trait PromptTemplate: Send + Sync {
    /// Get the template name/identifier
    fn name(&self) -> &str;

    /// Render the template with variables
    fn render(&self, vars: &serde_json::Value) -> Result<String>;

    /// Get the raw template source (for debugging/inspection)
    fn raw_template(&self) -> &str;
}
