//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::eclipse::PHASES;

/// One phase as seen by templates
#[derive(Debug, Clone, Serialize)]
pub struct PhaseContext {
    pub key: &'static str,
    pub label: &'static str,
}

/// Context for rendering prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Requested voice
    pub tone: String,
    /// Tool the model must call
    pub tool_name: String,
    /// Phases in order
    pub phases: Vec<PhaseContext>,
}

impl PromptContext {
    pub fn narrative(tone: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            tone: tone.into(),
            tool_name: tool_name.into(),
            phases: PHASES
                .iter()
                .map(|p| PhaseContext {
                    key: p.key(),
                    label: p.label(),
                })
                .collect(),
        }
    }
}

/// Prompts are plain text, not HTML
fn plain_handlebars() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(handlebars::no_escape);
    hbs
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `~/.config/umbra/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader that checks `dir` for overrides
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            hbs: plain_handlebars(),
            user_dir: if dir.exists() { Some(dir.to_path_buf()) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self {
            hbs: plain_handlebars(),
            user_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from user override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        let template = self.load_template(template_name)?;
        debug!(%template_name, tone = %context.tone, "render: called");

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prompt_context_lists_all_phases() {
        let ctx = PromptContext::narrative("hushed", "record_captions");
        let keys: Vec<_> = ctx.phases.iter().map(|p| p.key).collect();
        assert_eq!(
            keys,
            vec!["before", "first_contact", "during_peak", "totality", "return_of_light", "afterglow"]
        );
    }

    #[test]
    fn test_render_embedded_system() {
        let loader = PromptLoader::embedded_only();
        let ctx = PromptContext::narrative("hushed", "record_captions");

        let rendered = loader.render("narrative-system", &ctx).unwrap();
        assert!(rendered.contains("Voice: hushed."));
        assert!(rendered.contains("record_captions"));
    }

    #[test]
    fn test_render_does_not_html_escape() {
        let loader = PromptLoader::embedded_only();
        let ctx = PromptContext::narrative("tender & \"unhurried\"", "record_captions");

        let rendered = loader.render("narrative-system", &ctx).unwrap();
        assert!(rendered.contains("Voice: tender & \"unhurried\"."));
    }

    #[test]
    fn test_render_embedded_user_lists_phases() {
        let loader = PromptLoader::embedded_only();
        let ctx = PromptContext::narrative("hushed", "record_captions");

        let rendered = loader.render("narrative-user", &ctx).unwrap();
        assert!(rendered.contains("- first_contact: First Contact"));
        assert!(rendered.contains("- afterglow: Afterglow"));
    }

    #[test]
    fn test_user_override_wins() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("narrative-system.pmt"), "Custom {{tone}}").unwrap();

        let loader = PromptLoader::new(dir.path());
        let ctx = PromptContext::narrative("wry", "record_captions");

        assert_eq!(loader.render("narrative-system", &ctx).unwrap(), "Custom wry");
        // No override for this one
        assert!(loader.render("narrative-user", &ctx).unwrap().contains("totality"));
    }

    #[test]
    fn test_missing_template() {
        let loader = PromptLoader::embedded_only();
        let ctx = PromptContext::narrative("hushed", "record_captions");
        assert!(loader.render("nope", &ctx).is_err());
    }
}
