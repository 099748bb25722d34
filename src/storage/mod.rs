//! Interaction Storage Abstraction
//!
//! Information Hiding:
//! - Storage backend implementation details hidden behind trait
//! - Allows swapping between SQLite and memory without API changes
//! - The log is append-only: no update or delete is exposed

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryInteractionStore;
pub use sqlite::SqliteInteractionStore;

/// One stored question/answer exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    /// Text analyzed for this record: question and answer joined by a space
    pub fn document(&self) -> String {
        format!("{} {}", self.question, self.answer)
    }
}

/// Trait defining the interaction log interface
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Ensure the backing storage exists. Safe to call more than once.
    async fn initialize(&self) -> Result<()>;

    /// Persist a new record and return its id
    ///
    /// Both `question` and `answer` must be non-empty. A failed append
    /// leaves no partial record behind.
    async fn append(&self, question: &str, answer: &str) -> Result<i64>;

    /// All records ordered by id ascending
    /// Returns empty vector if nothing has been stored
    async fn all(&self) -> Result<Vec<InteractionRecord>>;

    /// Number of stored records
    async fn count(&self) -> Result<usize> {
        Ok(self.all().await?.len())
    }
}
