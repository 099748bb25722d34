pub mod llm;

pub use llm::{CompletionService, MissingApiKey, OpenAiCompletionClient};
