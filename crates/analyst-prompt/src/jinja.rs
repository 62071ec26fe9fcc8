//! MiniJinja-based template implementation
//!
//! This module provides a [`JinjaTemplate`] implementation that uses the MiniJinja
//! template engine for variable interpolation and conditional rendering.

use crate::{PromptError, PromptTemplate, Result};
use minijinja::{Environment, UndefinedBehavior};

/// A prompt template backed by MiniJinja
///
/// # Template Syntax
///
/// The template uses standard Jinja2 syntax:
/// - Variables: `{{ variable }}`
/// - Filters: `{{ name | upper }}`
/// - Conditionals: `{% if condition %}...{% endif %}`
/// - Loops: `{% for item in items %}...{% endfor %}`
///
/// Rendering is strict: referencing a variable that was not supplied is an
/// error rather than an empty string, so a prompt can never silently go out
/// without its data.
pub struct JinjaTemplate {
    name: String,
    source: String,
}

impl JinjaTemplate {
    /// Create a template, checking that the source parses
    ///
    /// # Examples
    ///
    /// ```
    /// use analyst_prompt::JinjaTemplate;
    ///
    /// assert!(JinjaTemplate::new("simple", "Hello, {{ name }}!").is_ok());
    /// assert!(JinjaTemplate::new("broken", "{{ unclosed").is_err());
    /// ```
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        let env = Environment::new();
        env.template_from_str(&source)
            .map_err(|e| PromptError::TemplateParseFailed {
                name: name.clone(),
                detail: e.to_string(),
            })?;

        Ok(Self { name, source })
    }
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, vars: &serde_json::Value) -> Result<String> {
        // Create a new environment for each render to avoid lifetime issues
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        let value = minijinja::Value::from_serialize(vars);

        env.render_str(&self.source, value)
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }

    fn raw_template(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("len", &self.source.len())
            .finish()
    }
}
