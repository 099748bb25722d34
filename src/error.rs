//! Error taxonomy shared by the store, the analyzer and the completion client
//!
//! Every failure is reported to the caller as a typed value; nothing here is
//! process-fatal. Storage errors are never retried internally.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied input was rejected before touching storage
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("failed to write interaction: {0}")]
    StorageWrite(String),

    #[error("failed to read interactions: {0}")]
    StorageRead(String),

    #[error("no interactions available for analysis")]
    InsufficientData,

    #[error("vocabulary too small for topic modeling ({terms} distinct term(s), need at least 2)")]
    InsufficientVocabulary { terms: usize },

    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),

    #[error("analysis worker failed: {0}")]
    AnalysisWorker(String),

    #[error("completion service error: {0}")]
    CompletionService(String),
}

impl Error {
    /// Precondition failures the caller can clear by recording more data
    pub fn is_insufficient(&self) -> bool {
        matches!(
            self,
            Error::InsufficientData | Error::InsufficientVocabulary { .. }
        )
    }
}

pub(crate) fn ensure_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
