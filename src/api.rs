//! Simple async API facade
//!
//! This module ties the interaction log, the completion service and the
//! pattern analyzer together behind one context object. Nothing is global:
//! callers build an [`InteractionManager`] and pass it where it is needed.

use crate::analysis::{AnalysisConfig, PatternAnalyzer, TopicResult};
use crate::config::Settings;
use crate::core::llm::{CompletionService, MissingApiKey, OpenAiCompletionClient};
use crate::error::{ensure_non_empty, Error, Result};
use crate::storage::{
    InMemoryInteractionStore, InteractionRecord, InteractionStore, SqliteInteractionStore,
};
use std::sync::Arc;

/// A question answered and logged in one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

pub struct InteractionManager {
    store: Arc<dyn InteractionStore>,
    completion: Arc<dyn CompletionService>,
    analysis: AnalysisConfig,
}

impl InteractionManager {
    /// Wrap an already initialized store
    pub fn new(
        store: Arc<dyn InteractionStore>,
        completion: Arc<dyn CompletionService>,
        analysis: AnalysisConfig,
    ) -> Self {
        Self {
            store,
            completion,
            analysis,
        }
    }

    /// Open the SQLite log named in `settings` and build the OpenAI client
    ///
    /// Without an API key the log and analysis still work; `ask` then fails
    /// with a completion service error.
    ///
    /// # Example
    /// ```no_run
    /// use interlog::{InteractionManager, Settings};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let settings = Settings::new()?;
    ///     let manager = InteractionManager::from_settings(&settings, Settings::api_key().ok()).await?;
    ///     let exchange = manager.ask("What is Rust?").await?;
    ///     println!("{}", exchange.answer);
    ///     Ok(())
    /// }
    /// ```
    pub async fn from_settings(settings: &Settings, api_key: Option<String>) -> Result<Self> {
        let store = SqliteInteractionStore::open(&settings.storage.database_path).await?;
        store.initialize().await?;

        tracing::info!(
            "Interaction manager ready (database: {})",
            settings.storage.database_path
        );

        Ok(Self::new(
            Arc::new(store),
            completion_service(settings, api_key)?,
            settings.analysis.clone(),
        ))
    }

    /// Like [`InteractionManager::from_settings`] but the log lives in memory
    /// and is discarded when the manager is dropped
    pub async fn ephemeral(settings: &Settings, api_key: Option<String>) -> Result<Self> {
        let store = InMemoryInteractionStore::new();
        store.initialize().await?;

        tracing::info!("Interaction manager ready (in-memory log)");

        Ok(Self::new(
            Arc::new(store),
            completion_service(settings, api_key)?,
            settings.analysis.clone(),
        ))
    }

    /// Ask the completion service and log the exchange
    ///
    /// Nothing is stored when the service fails.
    pub async fn ask(&self, question: &str) -> Result<Exchange> {
        ensure_non_empty("question", question)?;

        let answer = self.completion.get_answer(question).await?;
        let id = self.store.append(question, &answer).await?;

        Ok(Exchange {
            id,
            question: question.to_string(),
            answer,
        })
    }

    /// Log an exchange answered elsewhere
    pub async fn record(&self, question: &str, answer: &str) -> Result<i64> {
        self.store.append(question, answer).await
    }

    pub async fn interactions(&self) -> Result<Vec<InteractionRecord>> {
        self.store.all().await
    }

    pub fn analysis_config(&self) -> &AnalysisConfig {
        &self.analysis
    }

    /// Run topic discovery over the whole log with the configured settings
    pub async fn discover_patterns(&self) -> Result<Vec<TopicResult>> {
        self.discover_patterns_with(self.analysis.clone()).await
    }

    /// Run topic discovery with an explicit configuration
    ///
    /// The model is fitted on a blocking worker so async callers are not stalled.
    pub async fn discover_patterns_with(&self, config: AnalysisConfig) -> Result<Vec<TopicResult>> {
        let records = self.store.all().await?;
        tracing::debug!("Discovering patterns over {} interactions", records.len());

        tokio::task::spawn_blocking(move || PatternAnalyzer::new(config).discover(&records))
            .await
            .map_err(|e| Error::AnalysisWorker(e.to_string()))?
    }
}

fn completion_service(settings: &Settings, api_key: Option<String>) -> Result<Arc<dyn CompletionService>> {
    Ok(match api_key {
        Some(key) => Arc::new(OpenAiCompletionClient::new(key, settings.llm.clone())?),
        None => Arc::new(MissingApiKey),
    })
}
