//! Prompt Renderer - Render templates with context variables using Handlebars
//!
//! Rendering runs in strict mode: a template slot with no value in the context
//! is an error rather than an empty string.

use std::collections::HashMap;

use handlebars::Handlebars;

use crate::error::{ResumeError, Result};

/// Renders registered prompt templates using Handlebars
pub(crate) struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    /// Create a new PromptRenderer with no templates registered
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        // Resume documents are HTML; pass them through untouched
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Register a named template for later use
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| ResumeError::Template(format!("Failed to register template '{}': {}", name, e)))
    }

    /// Render a previously registered template
    ///
    /// # Arguments
    /// * `name` - Name given to [`PromptRenderer::register_template`]
    /// * `context` - A HashMap of variable names to values
    pub fn render_named(&self, name: &str, context: &HashMap<&str, &str>) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| ResumeError::Template(format!("Failed to render template '{}': {}", name, e)))
    }
}
