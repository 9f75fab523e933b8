use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::LlmConfig;
use crate::llm::llm_interface::StructuredLLMInterface;
use crate::llm::openai_compatible_llm::OpenAICompatibleLLM;

/// Factory for creating structured-output LLM clients
pub struct LLMFactory;

impl LLMFactory {
    /// Create an LLM client for `config.provider`.
    ///
    /// All supported providers speak the OpenAI chat-completions dialect and
    /// differ only in their default base URL.
    pub fn create_llm(config: &LlmConfig) -> Result<Arc<dyn StructuredLLMInterface>> {
        info!("Initializing LLM: {}", config.provider);

        let default_base_url = Self::default_base_url(&config.provider)
            .ok_or_else(|| anyhow::anyhow!("Unsupported LLM provider: {}", config.provider))?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url.to_string());

        let llm = OpenAICompatibleLLM::new(
            config.model.clone(),
            base_url,
            config.api_key.clone(),
            config.temperature,
            config.store,
            config.output_mode,
            config.request_timeout_secs.map(Duration::from_secs),
        )?
        .with_key_required(Self::requires_key(&config.provider));
        Ok(Arc::new(llm))
    }

    /// Hosted providers reject unauthenticated requests; a local Ollama does not.
    pub fn requires_key(provider: &str) -> bool {
        provider != "ollama_llm"
    }

    fn default_base_url(provider: &str) -> Option<&'static str> {
        match provider {
            "openai_llm" | "openai_compatible_llm" => Some("https://api.openai.com/v1"),
            "deepseek_llm" => Some("https://api.deepseek.com/v1"),
            "groq_llm" => Some("https://api.groq.com/openai/v1"),
            "mistral_llm" => Some("https://api.mistral.ai/v1"),
            "ollama_llm" => Some("http://localhost:11434/v1"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::llm_interface::{ChatMessage, CompletionRequest, OutputSchema};
    use mockito::Matcher;
    use serde_json::json;

    const PROVIDERS: [&str; 6] = [
        "openai_llm",
        "openai_compatible_llm",
        "deepseek_llm",
        "groq_llm",
        "mistral_llm",
        "ollama_llm",
    ];

    #[test]
    fn known_providers_are_created() {
        for provider in PROVIDERS {
            let config = LlmConfig {
                provider: provider.to_string(),
                api_key: Some("k".to_string()),
                ..LlmConfig::default()
            };
            let llm = LLMFactory::create_llm(&config).unwrap();
            assert!(llm.is_configured());
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = LlmConfig {
            provider: "llama_cpp_llm".to_string(),
            ..LlmConfig::default()
        };
        let err = LLMFactory::create_llm(&config).err().unwrap();
        assert!(err.to_string().contains("Unsupported LLM provider"));
    }

    #[test]
    fn missing_key_is_reported_unconfigured() {
        let llm = LLMFactory::create_llm(&LlmConfig::default()).unwrap();
        assert!(!llm.is_configured());
    }

    #[tokio::test]
    async fn ollama_completes_without_a_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::PartialJson(json!({"model": "llama3.1"})))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"{\"input\":{}}"}}]}"#)
            .create_async()
            .await;

        let config = LlmConfig {
            provider: "ollama_llm".to_string(),
            base_url: Some(format!("{}/v1", server.url())),
            api_key: None,
            model: "llama3.1".to_string(),
            ..LlmConfig::default()
        };
        let llm = LLMFactory::create_llm(&config).unwrap();
        assert!(llm.is_configured());

        let completion = llm
            .complete(CompletionRequest {
                messages: vec![ChatMessage::user("{}")],
                schema: OutputSchema {
                    name: "demo".to_string(),
                    schema: json!({"type": "object"}),
                },
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(completion.first_content(), Some(r#"{"input":{}}"#));
    }

    #[test]
    fn only_ollama_runs_without_a_key() {
        for provider in PROVIDERS {
            assert_eq!(LLMFactory::requires_key(provider), provider != "ollama_llm");
        }
    }
}
