//! Prompt template registry
//!
//! This module provides [`PromptRegistry`], a thread-safe registry for managing
//! and accessing prompt templates.

use crate::{PromptError, PromptTemplate, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A thread-safe registry for managing prompt templates
///
/// # Examples
///
/// ```
/// use analyst_prompt::{JinjaTemplate, PromptRegistry};
/// use serde_json::json;
///
/// let registry = PromptRegistry::new();
/// registry.register(JinjaTemplate::new("greeting", "Hello, {{ name }}!").unwrap());
///
/// let result = registry.render("greeting", &json!({ "name": "World" })).unwrap();
/// assert_eq!(result, "Hello, World!");
/// ```
#[derive(Default)]
pub struct PromptRegistry {
    templates: RwLock<HashMap<String, Arc<dyn PromptTemplate>>>,
}

impl PromptRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template
    ///
    /// If a template with the same name already exists, it will be replaced.
    pub fn register<T: PromptTemplate + 'static>(&self, template: T) {
        if let Ok(mut templates) = self.templates.write() {
            templates.insert(template.name().to_string(), Arc::new(template));
        }
    }

    /// Get a template by name
    ///
    /// Returns `None` if the template is not registered.
    pub fn get(&self, name: &str) -> Option<Arc<dyn PromptTemplate>> {
        self.templates.read().ok()?.get(name).cloned()
    }

    /// Check if a template is registered
    pub fn contains(&self, name: &str) -> bool {
        self.templates
            .read()
            .map(|t| t.contains_key(name))
            .unwrap_or(false)
    }

    /// Render a registered template
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template is not registered
    /// - Rendering fails
    pub fn render(&self, name: &str, vars: &serde_json::Value) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| PromptError::TemplateNotRegistered(name.to_string()))?;

        template.render(vars)
    }

    /// List all registered template names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .read()
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Get the number of registered templates
    pub fn len(&self) -> usize {
        self.templates.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("templates", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JinjaTemplate;
    use serde_json::json;

    #[test]
    fn test_register_and_render() {
        let registry = PromptRegistry::new();
        assert!(registry.is_empty());

        registry.register(JinjaTemplate::new("a", "A {{ x }}").unwrap());
        registry.register(JinjaTemplate::new("b", "B {{ x }}").unwrap());

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert_eq!(registry.list(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(registry.render("b", &json!({ "x": 1 })).unwrap(), "B 1");
    }

    #[test]
    fn test_register_replaces_existing() {
        let registry = PromptRegistry::new();
        registry.register(JinjaTemplate::new("a", "old").unwrap());
        registry.register(JinjaTemplate::new("a", "new").unwrap());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.render("a", &json!({})).unwrap(), "new");
    }

    #[test]
    fn test_render_unregistered() {
        let registry = PromptRegistry::new();
        let result = registry.render("missing", &json!({}));
        assert!(matches!(result, Err(PromptError::TemplateNotRegistered(name)) if name == "missing"));
    }

    #[test]
    fn test_get_returns_shared_template() {
        let registry = PromptRegistry::new();
        registry.register(JinjaTemplate::new("a", "raw {{ x }}").unwrap());

        let template = registry.get("a").unwrap();
        assert_eq!(template.raw_template(), "raw {{ x }}");
        assert!(registry.get("b").is_none());
    }
}
