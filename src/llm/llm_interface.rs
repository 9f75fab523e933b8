use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single chat message sent upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Named JSON schema the completion must conform to
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: serde_json::Value,
}

/// One structured completion request: the conversation plus the expected output shape
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub schema: OutputSchema,
}

/// Completion envelope as returned by OpenAI-compatible APIs.
/// Only the fields the relay reads are modelled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<AssistantMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

impl ChatCompletion {
    /// Completion with a single choice carrying `content`
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: Some(AssistantMessage {
                    content: Some(content.into()),
                    refusal: None,
                }),
            }],
        }
    }

    /// Content of the first choice, if it is present and non-empty
    pub fn first_content(&self) -> Option<&str> {
        self.first_message()
            .and_then(|m| m.content.as_deref())
            .filter(|c| !c.trim().is_empty())
    }

    pub fn refusal(&self) -> Option<&str> {
        self.first_message().and_then(|m| m.refusal.as_deref())
    }

    fn first_message(&self) -> Option<&AssistantMessage> {
        self.choices.first().and_then(|c| c.message.as_ref())
    }
}

/// Failures of the upstream completion capability
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("LLM provider is not configured: {0}")]
    NotConfigured(String),

    #[error("request to LLM provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("LLM provider responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode LLM provider response: {0}")]
    Decode(String),
}

/// Interface for a language model that answers with schema-constrained JSON.
/// Implementations hold no per-request state.
#[async_trait]
pub trait StructuredLLMInterface: Send + Sync {
    /// Request a single completion whose content conforms to `request.schema`
    async fn complete(&self, request: CompletionRequest) -> Result<ChatCompletion, LLMError>;

    /// Whether the provider has the credentials it needs
    fn is_configured(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_content_of_decoded_completion() {
        let completion: ChatCompletion = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"{}"}}]}"#,
        )
        .unwrap();
        assert_eq!(completion.first_content(), Some("{}"));
    }

    #[test]
    fn missing_or_blank_content_is_none() {
        let no_choices: ChatCompletion = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(no_choices.first_content(), None);

        let null_content: ChatCompletion = serde_json::from_str(
            r#"{"choices":[{"message":{"content":null,"refusal":"no"}}]}"#,
        )
        .unwrap();
        assert_eq!(null_content.first_content(), None);
        assert_eq!(null_content.refusal(), Some("no"));

        assert_eq!(ChatCompletion::from_content("  ").first_content(), None);
        assert_eq!(ChatCompletion::default().first_content(), None);
    }
}
