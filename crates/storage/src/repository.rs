use async_trait::async_trait;
use exam_core::model::{ExamResult, Question, QuestionId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A persisted exam result together with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamResultRow {
    pub id: i64,
    pub result: ExamResult,
}

impl ExamResultRow {
    #[must_use]
    pub fn new(id: i64, result: ExamResult) -> Self {
        Self { id, result }
    }
}

/// Repository contract for the question bank.
#[async_trait]
pub trait QuestionBankRepository: Send + Sync {
    /// Persist or replace a question by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// Persist a batch of questions.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` encountered.
    async fn upsert_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        for question in questions {
            self.upsert_question(question).await?;
        }
        Ok(())
    }

    /// All questions in the bank, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Distinct subjects in the bank, sorted alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_subjects(&self) -> Result<Vec<String>, StorageError>;

    /// Number of questions in the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn count_questions(&self) -> Result<u32, StorageError>;
}

/// Repository contract for finished exam attempts.
#[async_trait]
pub trait ExamResultRepository: Send + Sync {
    /// Append a result and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, result: &ExamResult) -> Result<i64, StorageError>;

    /// Fetch a result by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_result(&self, id: i64) -> Result<ExamResult, StorageError>;

    /// Most recent results first, at most `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn list_results(&self, limit: u32) -> Result<Vec<ExamResultRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<BTreeMap<QuestionId, Question>>>,
    results: Arc<Mutex<Vec<ExamResult>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl QuestionBankRepository for InMemoryRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self.questions.lock().map_err(poisoned)?;
        guard.insert(question.id(), question.clone());
        Ok(())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    async fn list_subjects(&self) -> Result<Vec<String>, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        let mut subjects: Vec<String> = guard.values().map(|q| q.subject().to_string()).collect();
        subjects.sort();
        subjects.dedup();
        Ok(subjects)
    }

    async fn count_questions(&self) -> Result<u32, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        u32::try_from(guard.len())
            .map_err(|_| StorageError::Serialization("question count overflow".into()))
    }
}

#[async_trait]
impl ExamResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &ExamResult) -> Result<i64, StorageError> {
        let mut guard = self.results.lock().map_err(poisoned)?;
        guard.push(result.clone());
        i64::try_from(guard.len()).map_err(|_| StorageError::Serialization("id overflow".into()))
    }

    async fn get_result(&self, id: i64) -> Result<ExamResult, StorageError> {
        let guard = self.results.lock().map_err(poisoned)?;
        let index = id
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or(StorageError::NotFound)?;
        guard.get(index).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ExamResultRow>, StorageError> {
        let guard = self.results.lock().map_err(poisoned)?;
        let mut rows = guard
            .iter()
            .enumerate()
            .map(|(index, result)| {
                let id = i64::try_from(index + 1)
                    .map_err(|_| StorageError::Serialization("id overflow".into()))?;
                Ok(ExamResultRow::new(id, result.clone()))
            })
            .collect::<Result<Vec<_>, StorageError>>()?;
        rows.sort_by(|a, b| {
            b.result
                .completed_at()
                .cmp(&a.result.completed_at())
                .then_with(|| b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionBankRepository>,
    pub results: Arc<dyn ExamResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionBankRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ExamResultRepository> = Arc::new(repo);
        Self { questions, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use exam_core::model::{Difficulty, SubmitReason};
    use exam_core::time::fixed_now;

    fn build_question(id: u64, subject: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            subject,
            Difficulty::Easy,
            format!("Question {id}"),
            vec!["yes".into(), "no".into()],
            0,
        )
        .unwrap()
    }

    fn build_result(minutes: i64) -> ExamResult {
        let start = fixed_now();
        ExamResult::from_persisted(
            start,
            start + Duration::minutes(minutes),
            SubmitReason::Manual,
            0,
            0,
            0,
            BTreeMap::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_question_with_same_id() {
        let repo = InMemoryRepository::new();
        repo.upsert_question(&build_question(1, "History")).await.unwrap();
        repo.upsert_question(&build_question(1, "Geography")).await.unwrap();

        let all = repo.list_questions().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].subject(), "Geography");
        assert_eq!(repo.count_questions().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn subjects_are_distinct_and_sorted() {
        let repo = InMemoryRepository::new();
        repo.upsert_questions(&[
            build_question(1, "Science"),
            build_question(2, "History"),
            build_question(3, "Science"),
        ])
        .await
        .unwrap();

        let subjects = repo.list_subjects().await.unwrap();
        assert_eq!(subjects, vec!["History".to_string(), "Science".to_string()]);
    }

    #[tokio::test]
    async fn results_are_listed_newest_first() {
        let repo = InMemoryRepository::new();
        let first = repo.append_result(&build_result(5)).await.unwrap();
        let second = repo.append_result(&build_result(30)).await.unwrap();
        let third = repo.append_result(&build_result(10)).await.unwrap();

        let rows = repo.list_results(2).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![second, third]);
        assert_eq!(repo.get_result(first).await.unwrap(), build_result(5));
        assert!(matches!(repo.get_result(99).await, Err(StorageError::NotFound)));
        assert!(matches!(repo.get_result(0).await, Err(StorageError::NotFound)));
    }
}
