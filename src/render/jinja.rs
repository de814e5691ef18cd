//! Render capability backed by minijinja

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use super::{Bindings, Render};
use crate::error::{AstGenError, Result};

/// Jinja-syntax renderer
///
/// Undefined names are errors rather than empty strings, nothing is
/// auto-escaped, and block tags on their own line leave no blank line behind.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self { env }
    }
}

impl Render for MiniJinjaRenderer {
    fn render(&self, template_source: &str, bindings: &Bindings) -> Result<String> {
        self.env
            .render_str(template_source, bindings)
            .map_err(|e| AstGenError::Template(e.to_string()))
    }
}
