use chrono::{DateTime, Utc};
use std::sync::Arc;

use exam_core::model::{ExamResult, ScoreBand, SubmitReason};
use storage::repository::{ExamResultRepository, ExamResultRow};

use crate::Clock;
use crate::error::ExamError;

/// Storage identifier for a persisted exam result.
pub type ExamResultId = i64;

/// Presentation-agnostic list item for a finished attempt.
///
/// No pre-formatted strings; the UI formats timestamps and labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamResultListItem {
    pub id: ExamResultId,
    pub completed_at: DateTime<Utc>,
    pub reason: SubmitReason,

    pub total: u32,
    pub answered: u32,
    pub correct: u32,
    pub percentage: u8,
    pub band: ScoreBand,
    pub elapsed_secs: i64,
}

impl ExamResultListItem {
    #[must_use]
    pub fn from_result(id: ExamResultId, result: &ExamResult) -> Self {
        Self {
            id,
            completed_at: result.completed_at(),
            reason: result.reason(),
            total: result.total(),
            answered: result.answered(),
            correct: result.correct(),
            percentage: result.percentage(),
            band: result.band(),
            elapsed_secs: result.elapsed_secs(),
        }
    }

    #[must_use]
    pub fn from_row(row: &ExamResultRow) -> Self {
        Self::from_result(row.id, &row.result)
    }
}

/// History facade that hides repositories and time from the UI.
#[derive(Clone)]
pub struct ExamHistoryService {
    clock: Clock,
    results: Arc<dyn ExamResultRepository>,
}

impl ExamHistoryService {
    #[must_use]
    pub fn new(clock: Clock, results: Arc<dyn ExamResultRepository>) -> Self {
        Self { clock, results }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(
            clock,
            Arc::new(storage::repository::InMemoryRepository::new()),
        )
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Most recent attempts first.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Storage` on repository failures.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<ExamResultListItem>, ExamError> {
        let rows = self.results.list_results(limit).await?;
        Ok(rows.iter().map(ExamResultListItem::from_row).collect())
    }

    /// Load one attempt, including its per-subject breakdown.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Storage` (including `StorageError::NotFound`).
    pub async fn get_result(&self, id: ExamResultId) -> Result<ExamResult, ExamError> {
        Ok(self.results.get_result(id).await?)
    }
}
