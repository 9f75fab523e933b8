use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::llm_interface::{ChatCompletion, CompletionRequest, LLMError, StructuredLLMInterface};
use crate::config::OutputMode;

/// OpenAI compatible LLM implementation.
/// Talks to `{base_url}/chat/completions` directly.
pub struct OpenAICompatibleLLM {
    client: Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
    requires_key: bool,
    temperature: f64,
    store: bool,
    output_mode: OutputMode,
}

impl OpenAICompatibleLLM {
    pub fn new(
        model: String,
        base_url: String,
        api_key: Option<String>,
        temperature: f64,
        store: bool,
        output_mode: OutputMode,
        request_timeout: Option<Duration>,
    ) -> Result<Self, LLMError> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        info!(
            "Initialized OpenAICompatibleLLM: model={}, base_url={}, output_mode={:?}",
            model, base_url, output_mode
        );
        Ok(Self {
            client,
            model,
            base_url,
            api_key,
            requires_key: true,
            temperature,
            store,
            output_mode,
        })
    }

    /// Whether requests are refused without an API key. Local servers such as
    /// Ollama accept unauthenticated requests.
    pub fn with_key_required(mut self, requires_key: bool) -> Self {
        self.requires_key = requires_key;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Build the JSON body of a chat completion request
    pub fn request_body(&self, request: &CompletionRequest) -> Value {
        let response_format = match self.output_mode {
            OutputMode::JsonSchema => json!({
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema.name,
                    "strict": true,
                    "schema": request.schema.schema,
                }
            }),
            OutputMode::JsonObject => json!({ "type": "json_object" }),
        };

        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": self.temperature,
            "response_format": response_format,
        });
        if self.store {
            body["store"] = Value::Bool(true);
        }
        body
    }
}

/// Pull `error.message` out of an OpenAI error envelope, falling back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl StructuredLLMInterface for OpenAICompatibleLLM {
    async fn complete(&self, request: CompletionRequest) -> Result<ChatCompletion, LLMError> {
        if !self.is_configured() {
            return Err(LLMError::NotConfigured("missing API key".to_string()));
        }

        let body = self.request_body(&request);
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            schema = %request.schema.name,
            "Requesting chat completion"
        );

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(api_key) = self.api_key.as_deref() {
            builder = builder.bearer_auth(api_key);
        }
        let response = builder.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = error_message(&text);
            warn!(status = status.as_u16(), "LLM provider returned an error");
            return Err(LLMError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!(bytes = text.len(), "Received chat completion");
        serde_json::from_str(&text).map_err(|e| LLMError::Decode(e.to_string()))
    }

    fn is_configured(&self) -> bool {
        !self.requires_key || self.api_key.is_some()
    }
}
