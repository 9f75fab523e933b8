use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::prompt::build_prompt;
use super::schema::translation_schema;
use super::types::{TranslateError, TranslationResult, TranslationTask, WrappedTranslation};
use crate::llm::{CompletionRequest, StructuredLLMInterface};

/// Translates tasks through a structured-output LLM.
/// One upstream call per task, no retries.
pub struct Translator {
    llm: Arc<dyn StructuredLLMInterface>,
}

impl Translator {
    pub fn new(llm: Arc<dyn StructuredLLMInterface>) -> Self {
        Self { llm }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_configured()
    }

    #[instrument(
        skip_all,
        fields(
            target_lang = %task.target_lang,
            has_importance = task.importance.is_some(),
            steps = task.steps.as_ref().map_or(0, Vec::len),
        )
    )]
    pub async fn translate(
        &self,
        task: &TranslationTask,
    ) -> Result<TranslationResult, TranslateError> {
        let prompt = build_prompt(task);
        debug!(payload_bytes = prompt.user.len(), "Built translation prompt");

        let request = CompletionRequest {
            messages: prompt.into_messages(),
            schema: translation_schema(),
        };
        let completion = self.llm.complete(request).await?;

        let content = match completion.first_content() {
            Some(content) => content,
            None => {
                if let Some(refusal) = completion.refusal() {
                    warn!(refusal, "Model refused the translation");
                }
                return Err(TranslateError::UpstreamEmpty);
            }
        };
        debug!(content_bytes = content.len(), "Received translation content");

        let wrapped: WrappedTranslation = serde_json::from_str(content)
            .map_err(|e| TranslateError::MalformedUpstreamContent(e.to_string()))?;
        let result = TranslationResult::conform(wrapped.input, task)?;

        info!("Translation completed");
        Ok(result)
    }
}
