//! Request/response envelopes for the text-generation service.
//!
//! The network call itself belongs to the caller; this module only shapes the
//! chat-completion body that asks for an outline in the format the extractor
//! understands, and reads the message text back out of the response.

use crate::config::validate_marker_tag;
use crate::error::{OutlineError, Result};
use serde::{Deserialize, Serialize};

const SYSTEM_INSTRUCTION: &str = "You are a text analysis assistant that generates hierarchical headings for text documents.";

/// Settings for the completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Must match `OutlineConfig::marker_tag` of the extractor
    pub marker_tag: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            marker_tag: "analysis".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Chat-completion request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Build the request asking for an outline of `document`
    pub fn for_document(document: &str, config: &PromptConfig) -> Result<Self> {
        validate_marker_tag(&config.marker_tag).map_err(OutlineError::invalid_config)?;

        let document = document.trim();
        if document.is_empty() {
            return Err(OutlineError::EmptyDocument);
        }

        Ok(Self {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: format!("{SYSTEM_INSTRUCTION}\n\n{}", schema_instruction(&config.marker_tag)),
                },
                ChatMessage {
                    role: Role::User,
                    content: format!(
                        "Please analyze the following text and generate hierarchical headings (level 1 through 5) based on the text structure and content:\n\n{document}"
                    ),
                },
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

/// Describe the payload format the extractor and normalizer expect
fn schema_instruction(tag: &str) -> String {
    format!(
        r#"Reply with a single JSON object wrapped in <{tag}> and </{tag}>. You may write prose outside the tags, never inside.
The object has one key "content" holding the level 1 heading:
{{"content": {{"heading": {{"level": 1, "text": "...", "content": [ ... ]}}}}}}
Each "content" array lists, in document order, paragraphs as {{"type": "paragraph", "text": "..."}} and subheadings as {{"heading": {{"level": N, "text": "...", "content": [ ... ]}}}}.
Use levels 1 through 5 only; a level N heading contains only level N+1 headings."#
    )
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Read `choices[0].message.content` from a chat-completion response body
pub fn completion_content(body: &str) -> Option<String> {
    let response: CompletionResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(err) => {
            log::debug!("Completion response is not a chat-completion envelope: {err}");
            return None;
        }
    };
    response
        .choices
        .into_iter()
        .next()?
        .message?
        .content
}
