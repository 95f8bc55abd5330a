//! Best-effort caption generation
//!
//! One request per session, no retries. Every failure ends with the built-in
//! table: a missing credential skips the request quietly, anything else is
//! logged as a warning.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use super::{NarrativeError, NarrativeTable};
use crate::config::Config;
use crate::eclipse::PHASES;
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, ToolDefinition, create_client};
use crate::prompts::{PromptContext, PromptLoader};

/// Tool the model is forced to call with the captions
pub const TOOL_NAME: &str = "record_eclipse_captions";

/// JSON schema requiring all six phase keys, each with three string fields
pub fn narrative_schema() -> serde_json::Value {
    let entry = json!({
        "type": "object",
        "properties": {
            "sentence": { "type": "string" },
            "feeling": { "type": "string" },
            "reflection": { "type": "string" }
        },
        "required": ["sentence", "feeling", "reflection"]
    });

    let properties: serde_json::Map<String, serde_json::Value> =
        PHASES.iter().map(|p| (p.key().to_string(), entry.clone())).collect();
    let required: Vec<&str> = PHASES.iter().map(|p| p.key()).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

/// Issues the caption request
pub struct NarrativeFetcher {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    tone: String,
    max_tokens: u32,
}

impl NarrativeFetcher {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, tone: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            llm,
            prompts,
            tone: tone.into(),
            max_tokens,
        }
    }

    /// Build a fetcher from config
    ///
    /// Fails with [`NarrativeError::Disabled`] or
    /// [`NarrativeError::MissingCredential`] when no request should be made.
    pub fn from_config(config: &Config) -> Result<Self, NarrativeError> {
        debug!(enabled = config.narrative.enabled, "NarrativeFetcher::from_config: called");
        if !config.narrative.enabled {
            return Err(NarrativeError::Disabled);
        }

        let llm = create_client(&config.llm).map_err(|e| match e {
            LlmError::MissingCredential(msg) => NarrativeError::MissingCredential(msg),
            other => NarrativeError::Request(other),
        })?;

        Ok(Self::new(
            llm,
            PromptLoader::new(config.narrative.expanded_prompt_dir()),
            config.narrative.tone.clone(),
            config.llm.max_tokens,
        ))
    }

    /// Request for the caption tool call
    pub fn request(&self) -> Result<CompletionRequest, NarrativeError> {
        let context = PromptContext::narrative(&self.tone, TOOL_NAME);
        let render = |name: &str| {
            self.prompts
                .render(name, &context)
                .map_err(|e| NarrativeError::Prompt(e.to_string()))
        };

        Ok(CompletionRequest {
            system_prompt: render("narrative-system")?,
            messages: vec![Message::user(render("narrative-user")?)],
            tools: vec![ToolDefinition::new(
                TOOL_NAME,
                "Record one caption for each of the six eclipse phases.",
                narrative_schema(),
            )],
            tool_choice: Some(TOOL_NAME.to_string()),
            max_tokens: self.max_tokens,
        })
    }

    /// Single attempt; the error says why the built-in table should stay
    pub async fn fetch(&self) -> Result<NarrativeTable, NarrativeError> {
        let request = self.request()?;
        let response = self.llm.complete(request).await?;

        if let Some(input) = response.tool_input(TOOL_NAME) {
            debug!("NarrativeFetcher::fetch: parsing tool input");
            return NarrativeTable::from_payload(input);
        }

        match response.content.as_deref() {
            Some(text) => {
                debug!("NarrativeFetcher::fetch: no tool call, parsing text");
                NarrativeTable::from_text(text)
            }
            None => Err(NarrativeError::Schema("response had neither tool call nor text".to_string())),
        }
    }

    /// Fetch, falling back to the built-in table on any failure
    pub async fn fetch_or_builtin(&self) -> NarrativeTable {
        match self.fetch().await {
            Ok(table) => {
                info!(fallbacks = table.fallbacks().len(), "Generated captions received");
                if !table.fallbacks().is_empty() {
                    warn!(phases = ?table.fallbacks(), "Generated captions incomplete, using built-in text for some phases");
                }
                table
            }
            Err(e) => {
                report(&e);
                NarrativeTable::builtin()
            }
        }
    }
}

/// Resolve captions for a session from config, never failing
pub async fn load_narrative(config: &Config) -> NarrativeTable {
    match NarrativeFetcher::from_config(config) {
        Ok(fetcher) => fetcher.fetch_or_builtin().await,
        Err(e) => {
            report(&e);
            NarrativeTable::builtin()
        }
    }
}

/// Log a recovered failure at the level it deserves
pub fn report(error: &NarrativeError) {
    if error.is_skip() {
        debug!(%error, "Caption request skipped, using built-in captions");
    } else {
        warn!(%error, "Caption request failed, using built-in captions");
    }
}
