//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{ExamResultError, QuestionError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the exam session and its orchestration.
///
/// Rejected inputs never mutate the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamError {
    #[error("position {position} is outside the paper of {len} questions")]
    PositionOutOfRange { position: usize, len: usize },
    #[error("option {option} is not valid at position {position} ({options} options)")]
    OptionOutOfRange {
        position: usize,
        option: usize,
        options: usize,
    },
    #[error("exam is not in progress")]
    NotInProgress,
    #[error("exam already finished")]
    AlreadyFinished,
    #[error("exam already started")]
    AlreadyStarted,
    #[error("exam session lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Result(#[from] ExamResultError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ExamError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound))
    }
}

/// Errors emitted while fetching a remote question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("question source is not configured")]
    NotConfigured,
    #[error("question source returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid question record at index {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Errors emitted by `QuestionBankService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error(transparent)]
    Source(#[from] QuestionSourceError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
}
