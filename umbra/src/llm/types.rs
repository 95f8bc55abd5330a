//! LLM request/response types for Umbra
//!
//! These types model the Anthropic Messages API, reduced to what a single
//! structured-output request needs.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (rendered from Handlebars template)
    pub system_prompt: String,

    /// User messages (just one for the narrative request)
    pub messages: Vec<Message>,

    /// Available tools
    pub tools: Vec<ToolDefinition>,

    /// Force the model to call this tool
    pub tool_choice: Option<String>,

    /// Max tokens for response (from config)
    pub max_tokens: u32,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Input of the first call to the named tool
    pub fn tool_input(&self, name: &str) -> Option<&serde_json::Value> {
        self.tool_calls.iter().find(|c| c.name == name).map(|c| &c.input)
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
}

impl StopReason {
    /// Parse from Anthropic API stop_reason string
    pub fn from_anthropic(s: &str) -> Self {
        debug!(%s, "StopReason::from_anthropic: called");
        match s {
            "end_turn" => StopReason::EndTurn,
            "tool_use" => StopReason::ToolUse,
            "max_tokens" => StopReason::MaxTokens,
            "stop_sequence" => StopReason::StopSequence,
            _ => {
                debug!("StopReason::from_anthropic: unknown, defaulting to EndTurn");
                StopReason::EndTurn
            }
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Tool definition for the LLM
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: serde_json::Value) -> Self {
        let name = name.into();
        let description = description.into();
        debug!(%name, "ToolDefinition::new: called");
        Self {
            name,
            description,
            input_schema,
        }
    }

    /// Convert to Anthropic API schema format
    pub fn to_anthropic_schema(&self) -> serde_json::Value {
        debug!(%self.name, "ToolDefinition::to_anthropic_schema: called");
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(Message::user("Hi there")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hi there");
    }

    #[test]
    fn test_stop_reason_from_anthropic() {
        assert_eq!(StopReason::from_anthropic("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from_anthropic("tool_use"), StopReason::ToolUse);
        assert_eq!(StopReason::from_anthropic("max_tokens"), StopReason::MaxTokens);
        assert_eq!(StopReason::from_anthropic("stop_sequence"), StopReason::StopSequence);
        assert_eq!(StopReason::from_anthropic("unknown"), StopReason::EndTurn);
    }

    #[test]
    fn test_tool_definition_to_anthropic_schema() {
        let tool = ToolDefinition::new(
            "record_captions",
            "Record captions",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "before": { "type": "object" }
                },
                "required": ["before"]
            }),
        );

        let schema = tool.to_anthropic_schema();
        assert_eq!(schema["name"], "record_captions");
        assert_eq!(schema["description"], "Record captions");
        assert!(schema["input_schema"].is_object());
    }

    #[test]
    fn test_tool_input_lookup() {
        let response = CompletionResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: "toolu_1".to_string(),
                name: "record_captions".to_string(),
                input: serde_json::json!({"ok": true}),
            }],
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage::default(),
        };

        assert_eq!(response.tool_input("record_captions").unwrap()["ok"], true);
        assert!(response.tool_input("other").is_none());
    }
}
