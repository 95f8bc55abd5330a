//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when template files are not found.

/// System prompt for the caption request
pub const NARRATIVE_SYSTEM: &str = r#"You write captions for a slow, wordless animation of a total solar eclipse.

Voice: {{tone}}.

For each phase write:
- sentence: one sentence, present tense, at most 18 words, describing what the viewer sees and feels.
- feeling: three or four lowercase mood words separated by commas.
- reflection: one short question the viewer can carry with them.

Never mention the animation, the screen, or yourself.
Record the captions with the {{tool_name}} tool and nothing else.
"#;

/// User message for the caption request
pub const NARRATIVE_USER: &str = r#"Write captions for these six phases, in order:
{{#each phases}}
- {{this.key}}: {{this.label}}
{{/each}}
"#;

/// Look up an embedded template by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "narrative-system" => Some(NARRATIVE_SYSTEM),
        "narrative-user" => Some(NARRATIVE_USER),
        _ => None,
    }
}
