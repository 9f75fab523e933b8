use std::sync::Arc;

use crate::config::Config;
use crate::contact::ContactForwarder;
use crate::llm::{LLMFactory, StructuredLLMInterface};
use crate::translate::Translator;

/// Shared, read-only handler state. Nothing here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translator: Arc<Translator>,
    pub contact: Arc<ContactForwarder>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = LLMFactory::create_llm(&config.llm)?;
        Ok(Self::with_llm(config, llm))
    }

    /// Build state around an existing LLM client
    pub fn with_llm(config: Config, llm: Arc<dyn StructuredLLMInterface>) -> Self {
        let contact = Arc::new(ContactForwarder::new(config.contact.script_url.clone()));
        Self {
            config: Arc::new(config),
            translator: Arc::new(Translator::new(llm)),
            contact,
        }
    }
}
