//! Prompt templates for generated captions
//!
//! Templates are Handlebars; a `.pmt` file in the configured prompt directory
//! overrides the embedded copy of the same name.

pub mod embedded;
mod loader;

pub use loader::{PhaseContext, PromptContext, PromptLoader};
