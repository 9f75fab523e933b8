pub mod prompt;
pub mod schema;
pub mod translator;
pub mod types;

pub use prompt::{build_prompt, PromptPair};
pub use translator::Translator;
pub use types::{TranslateError, TranslateRequest, TranslationResult, TranslationTask};
