//! Interlog - question/answer interaction log with topic pattern discovery
//!
//! This library persists every question/answer exchange in an append-only
//! SQLite log and mines the accumulated log for latent topics with LDA.

pub mod analysis;
mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;

pub mod api;
pub mod cli;

pub use api::*;
pub use config::{LLMConfig, LoggingConfig, Settings, StorageConfig};
pub use error::{Error, Result};

pub use analysis::{discover, AnalysisConfig, PatternAnalyzer, TopicResult};
pub use storage::{InMemoryInteractionStore, InteractionRecord, InteractionStore, SqliteInteractionStore};
