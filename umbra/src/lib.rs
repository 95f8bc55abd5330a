//! Umbra - a total solar eclipse, animated in the terminal
//!
//! One progress value in `[0, 1]` drives the whole show. Phases and visual
//! parameters are pure functions of it; a driver advances it each frame,
//! slowing down near totality. Captions for the six phases come from a
//! built-in table, optionally replaced by a generated one fetched once per
//! session.
//!
//! # Modules
//!
//! - [`eclipse`] - progress, phases, time dilation, visuals, frame ticker
//! - [`narrative`] - caption tables and the best-effort caption request
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`prompts`] - caption prompt templates
//! - [`showcase`] - single owner of animation and caption state
//! - [`tui`] - full-screen terminal view
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod eclipse;
pub mod llm;
pub mod narrative;
pub mod prompts;
pub mod showcase;
pub mod tui;

pub use config::Config;
pub use eclipse::{Phase, Progress, ProgressDriver, SpeedProfile, Visuals};
pub use narrative::{NarrativeEntry, NarrativeTable};
pub use showcase::Showcase;
