//! In-Memory Interaction Storage
//!
//! Information Hiding:
//! - Vec storage structure hidden from users
//! - Thread-safe access via RwLock hidden behind async interface
//! - Suitable for testing and ephemeral sessions

use super::{InteractionRecord, InteractionStore};
use crate::error::{ensure_non_empty, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory interaction log
/// Data is lost when process terminates
pub struct InMemoryInteractionStore {
    records: Arc<RwLock<Vec<InteractionRecord>>>,
}

impl InMemoryInteractionStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryInteractionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn append(&self, question: &str, answer: &str) -> Result<i64> {
        ensure_non_empty("question", question)?;
        ensure_non_empty("answer", answer)?;

        let mut records = self.records.write().await;
        let id = records.last().map(|r| r.id + 1).unwrap_or(1);
        let now = Utc::now();
        let timestamp = records
            .last()
            .map(|r| r.timestamp.max(now))
            .unwrap_or(now);

        records.push(InteractionRecord {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
            timestamp,
        });
        tracing::debug!("[InMemoryInteractionStore] Appended interaction {}", id);
        Ok(id)
    }

    async fn all(&self) -> Result<Vec<InteractionRecord>> {
        let records = self.records.read().await;
        tracing::debug!("[InMemoryInteractionStore] Loaded {} interactions", records.len());
        Ok(records.clone())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
