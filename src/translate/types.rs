use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::llm::LLMError;

/// Request body of `/api/translate` as received. Every field is optional here;
/// presence is checked when converting into a [`TranslationTask`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub importance: Option<String>,
    pub steps: Option<Vec<String>>,
    pub target_lang: Option<String>,
}

/// Validated translation input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTask {
    pub title: String,
    pub description: String,
    pub importance: Option<String>,
    pub steps: Option<Vec<String>>,
    pub target_lang: String,
}

/// Translated content, same shape as the task minus the target language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    #[error("upstream returned an empty response")]
    UpstreamEmpty,

    #[error("{0}")]
    UpstreamTransportFailure(#[from] LLMError),

    #[error("malformed upstream content: {0}")]
    MalformedUpstreamContent(String),
}

impl TranslateError {
    /// Errors caused by the caller's input rather than by the upstream service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<TranslateRequest> for TranslationTask {
    type Error = TranslateError;

    fn try_from(request: TranslateRequest) -> Result<Self, Self::Error> {
        let title = non_blank(request.title);
        let description = non_blank(request.description);
        let target_lang = non_blank(request.target_lang);

        match (title, description, target_lang) {
            (Some(title), Some(description), Some(target_lang)) => Ok(Self {
                title,
                description,
                importance: non_blank(request.importance),
                steps: request.steps.filter(|s| !s.is_empty()),
                target_lang,
            }),
            (title, description, target_lang) => {
                let mut missing = Vec::new();
                if title.is_none() {
                    missing.push("title");
                }
                if description.is_none() {
                    missing.push("description");
                }
                if target_lang.is_none() {
                    missing.push("targetLang");
                }
                Err(TranslateError::MissingField(missing))
            }
        }
    }
}

impl TranslationTask {
    /// Content sent upstream: the task without `targetLang`, optional fields only when
    /// present
    pub fn payload(&self) -> Value {
        let mut content = Map::new();
        content.insert("title".to_string(), Value::from(self.title.as_str()));
        content.insert("description".to_string(), Value::from(self.description.as_str()));
        if let Some(importance) = &self.importance {
            content.insert("importance".to_string(), Value::from(importance.as_str()));
        }
        if let Some(steps) = &self.steps {
            content.insert(
                "steps".to_string(),
                Value::Array(steps.iter().map(|s| Value::from(s.as_str())).collect()),
            );
        }
        Value::Object(content)
    }
}

/// Model output before validation. `null` and absent are the same thing here.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawTranslation {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub steps: Option<Vec<String>>,
}

/// Upstream content wrapped the same way as the user message
#[derive(Debug, Deserialize)]
pub(crate) struct WrappedTranslation {
    pub input: RawTranslation,
}

impl TranslationResult {
    /// Validate model output against the task it answers.
    ///
    /// Optional fields follow the task: fields the task lacks are dropped,
    /// fields the task carries must come back non-empty. Steps are translated
    /// one to one, so their count must match the task's.
    pub(crate) fn conform(
        raw: RawTranslation,
        task: &TranslationTask,
    ) -> Result<Self, TranslateError> {
        let malformed = |field: &str| {
            TranslateError::MalformedUpstreamContent(format!("`{}` is missing or empty", field))
        };

        let title = non_blank(raw.title).ok_or_else(|| malformed("title"))?;
        let description = non_blank(raw.description).ok_or_else(|| malformed("description"))?;

        let importance = match task.importance {
            Some(_) => Some(non_blank(raw.importance).ok_or_else(|| malformed("importance"))?),
            None => None,
        };
        let steps = match &task.steps {
            Some(expected) => {
                let steps = raw
                    .steps
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| malformed("steps"))?;
                if steps.len() != expected.len() {
                    return Err(TranslateError::MalformedUpstreamContent(format!(
                        "`steps` has {} items, expected {}",
                        steps.len(),
                        expected.len()
                    )));
                }
                Some(steps)
            }
            None => None,
        };

        Ok(Self {
            title,
            description,
            importance,
            steps,
        })
    }
}
