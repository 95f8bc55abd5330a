//! Captions for the six eclipse phases
//!
//! A [`NarrativeTable`] always holds exactly one entry per phase. Tables are
//! immutable once built; a generated table replaces the built-in one as a
//! whole value, with built-in entries standing in for any phase the
//! generated payload did not supply.

mod defaults;
pub mod fetch;

pub use defaults::builtin_entry;
pub use fetch::{NarrativeFetcher, TOOL_NAME, narrative_schema};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::eclipse::{PHASE_COUNT, PHASES, Phase};
use crate::llm::LlmError;

/// Errors from the caption request; all of them are recovered by showing
/// the built-in table
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("Narrative fetch disabled in config")]
    Disabled,

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Request failed: {0}")]
    Request(#[from] LlmError),

    #[error("Response does not match the caption schema: {0}")]
    Schema(String),

    #[error("Prompt rendering failed: {0}")]
    Prompt(String),
}

impl NarrativeError {
    /// Expected, quiet outcomes that do not deserve a warning
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Disabled | Self::MissingCredential(_))
    }
}

/// Caption for one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeEntry {
    /// Headline sentence
    pub sentence: String,
    /// Comma-separated mood words
    pub feeling: String,
    /// Reflective question
    pub reflection: String,
}

impl NarrativeEntry {
    pub fn new(sentence: impl Into<String>, feeling: impl Into<String>, reflection: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            feeling: feeling.into(),
            reflection: reflection.into(),
        }
    }

    /// Mood words, trimmed, empty items dropped
    pub fn moods(&self) -> Vec<&str> {
        self.feeling.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
    }

    /// Parse one entry from a payload value; `None` if any field is missing,
    /// not a string, or blank
    fn from_value(value: &serde_json::Value) -> Option<Self> {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Some(Self {
            sentence: field("sentence")?,
            feeling: field("feeling")?,
            reflection: field("reflection")?,
        })
    }
}

/// Where a table's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Builtin,
    Generated,
}

impl std::fmt::Display for NarrativeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => write!(f, "built-in"),
            Self::Generated => write!(f, "generated"),
        }
    }
}

/// One caption per phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeTable {
    entries: [NarrativeEntry; PHASE_COUNT],
    source: NarrativeSource,
    /// Phases a generated payload did not supply
    fallbacks: Vec<Phase>,
}

impl Default for NarrativeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NarrativeTable {
    /// The fixed built-in table
    pub fn builtin() -> Self {
        Self {
            entries: PHASES.map(builtin_entry),
            source: NarrativeSource::Builtin,
            fallbacks: Vec::new(),
        }
    }

    /// Build a generated table from a schema-shaped payload
    ///
    /// Missing or malformed phases take the built-in entry. A payload that
    /// is not an object, or supplies no usable phase at all, is a schema error.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, NarrativeError> {
        let object = payload
            .as_object()
            .ok_or_else(|| NarrativeError::Schema(format!("expected an object, got {}", type_name(payload))))?;

        let mut fallbacks = Vec::new();
        let entries = PHASES.map(|phase| match object.get(phase.key()).and_then(NarrativeEntry::from_value) {
            Some(entry) => entry,
            None => {
                debug!(phase = phase.key(), "NarrativeTable::from_payload: using built-in entry");
                fallbacks.push(phase);
                builtin_entry(phase)
            }
        });

        if fallbacks.len() == PHASE_COUNT {
            return Err(NarrativeError::Schema("no phase entries found".to_string()));
        }

        Ok(Self {
            entries,
            source: NarrativeSource::Generated,
            fallbacks,
        })
    }

    /// Parse a payload from model text, tolerating code fences and prose
    /// around the JSON object
    pub fn from_text(text: &str) -> Result<Self, NarrativeError> {
        let start = text.find('{');
        let end = text.rfind('}');
        let json = match (start, end) {
            (Some(s), Some(e)) if s < e => &text[s..=e],
            _ => return Err(NarrativeError::Schema("no JSON object in response text".to_string())),
        };
        let payload: serde_json::Value =
            serde_json::from_str(json).map_err(|e| NarrativeError::Schema(e.to_string()))?;
        Self::from_payload(&payload)
    }

    pub fn entry(&self, phase: Phase) -> &NarrativeEntry {
        &self.entries[phase.index()]
    }

    pub fn entries(&self) -> impl Iterator<Item = (Phase, &NarrativeEntry)> {
        PHASES.into_iter().zip(self.entries.iter())
    }

    pub fn source(&self) -> NarrativeSource {
        self.source
    }

    pub fn fallbacks(&self) -> &[Phase] {
        &self.fallbacks
    }
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
