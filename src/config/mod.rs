mod settings;

pub use settings::{LLMConfig, LoggingConfig, Settings, StorageConfig};
