use std::sync::Arc;

use exam_core::model::Question;
use storage::repository::QuestionBankRepository;
use storage::sample::sample_bank;

use crate::error::QuestionBankError;
use crate::question_source::QuestionSource;

/// Loads questions into the bank from the built-in sample or a remote source.
#[derive(Clone)]
pub struct QuestionBankService {
    questions: Arc<dyn QuestionBankRepository>,
}

impl QuestionBankService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionBankRepository>) -> Self {
        Self { questions }
    }

    /// Write the built-in sample bank. Existing questions with the same ids are replaced.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` if a sample entry is invalid or storage fails.
    pub async fn seed_sample(&self) -> Result<usize, QuestionBankError> {
        let bank = sample_bank()?;
        self.store(&bank).await?;
        tracing::info!(count = bank.len(), "seeded sample question bank");
        Ok(bank.len())
    }

    /// Fetch a bank from `source` and upsert it.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Source` if fetching fails, or storage errors.
    pub async fn import_from(&self, source: &dyn QuestionSource) -> Result<usize, QuestionBankError> {
        let bank = source.fetch_questions().await?;
        self.store(&bank).await?;
        tracing::info!(count = bank.len(), "imported question bank");
        Ok(bank.len())
    }

    /// Number of questions currently stored.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Storage` on repository failures.
    pub async fn count(&self) -> Result<u32, QuestionBankError> {
        Ok(self.questions.count_questions().await?)
    }

    async fn store(&self, bank: &[Question]) -> Result<(), QuestionBankError> {
        self.questions.upsert_questions(bank).await?;
        Ok(())
    }
}
