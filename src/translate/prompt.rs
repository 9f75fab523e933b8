use serde_json::json;

use super::types::TranslationTask;
use crate::llm::ChatMessage;

/// System instruction and user payload for one translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(self.system), ChatMessage::user(self.user)]
    }
}

pub fn system_instruction(target_lang: &str) -> String {
    format!(
        "You are a professional translator. Translate the text of the JSON object under \
         \"input\" from its source language into {lang}.\n\
         - Adapt the phrasing so it sounds natural to a native {lang} speaker; \
         do not translate word for word.\n\
         - If the source addresses the reader informally (for example the familiar \"you\"), \
         keep that informal register.\n\
         - Rephrase any line that would read ambiguously or unnaturally in {lang}.\n\
         - Keep the title consistent in meaning with the description.\n\
         - Keep the fields in their original order and do not add, drop or rename fields.\n\
         Respond ONLY with JSON of the same shape: the translated fields under the \"input\" key.",
        lang = target_lang
    )
}

/// Build the prompt for `task`. The user message is the task content wrapped as
/// `{"input": {...}}`, the same shape the model is asked to answer with.
pub fn build_prompt(task: &TranslationTask) -> PromptPair {
    PromptPair {
        system: system_instruction(&task.target_lang),
        user: json!({ "input": task.payload() }).to_string(),
    }
}
