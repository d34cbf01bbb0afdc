use std::sync::Arc;

use rand::Rng;

use exam_core::model::{ExamSettings, Question, Report, SubjectFilter};
use storage::repository::{ExamResultRepository, QuestionBankRepository};

use super::plan::estimate_paper_size;
use super::session::ExamSession;
use crate::Clock;
use crate::error::ExamError;

/// Outcome of submitting and persisting an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSubmission {
    pub report: Report,
    pub result_id: i64,
}

/// Orchestrates exam start from the question bank and persistence of finished attempts.
#[derive(Clone)]
pub struct ExamLoopService {
    clock: Clock,
    settings: ExamSettings,
    questions: Arc<dyn QuestionBankRepository>,
    results: Arc<dyn ExamResultRepository>,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: ExamSettings,
        questions: Arc<dyn QuestionBankRepository>,
        results: Arc<dyn ExamResultRepository>,
    ) -> Self {
        Self {
            clock,
            settings,
            questions,
            results,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn settings(&self) -> ExamSettings {
        self.settings
    }

    /// Distinct subjects available for selection.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Storage` on repository failures.
    pub async fn list_subjects(&self) -> Result<Vec<String>, ExamError> {
        Ok(self.questions.list_subjects().await?)
    }

    /// Number of questions a paper would hold for `filter`.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Storage` on repository failures.
    pub async fn estimate(&self, filter: &SubjectFilter) -> Result<usize, ExamError> {
        let bank = self.questions.list_questions().await?;
        Ok(estimate_paper_size(
            &bank,
            filter,
            self.settings.max_paper_len(),
        ))
    }

    /// Load the bank and start a new attempt for `filter`.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Storage` on repository failures.
    pub async fn start_exam(&self, filter: &SubjectFilter) -> Result<ExamSession, ExamError> {
        let bank = self.questions.list_questions().await?;
        let mut rng = rand::rng();
        self.start_from_bank(&bank, filter, &mut rng)
    }

    /// Start a new attempt with an injected RNG.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Storage` on repository failures.
    pub async fn start_exam_with_rng<R: Rng + ?Sized>(
        &self,
        filter: &SubjectFilter,
        rng: &mut R,
    ) -> Result<ExamSession, ExamError> {
        let bank = self.questions.list_questions().await?;
        self.start_from_bank(&bank, filter, rng)
    }

    /// Submit the attempt and persist its result.
    ///
    /// # Errors
    ///
    /// Returns a phase error if the session is not in progress, or
    /// `ExamError::Storage` if persistence fails. The session is finished
    /// even when persistence fails; `record_result` can retry.
    pub async fn submit(&self, session: &mut ExamSession) -> Result<ExamSubmission, ExamError> {
        let report = session.submit(self.clock.now())?;
        let result_id = self.record_result(session).await?;
        Ok(ExamSubmission { report, result_id })
    }

    /// Persist a finished attempt, whether submitted manually or by timeout.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotInProgress` if the session has not started,
    /// `ExamError::AlreadyStarted` if it is still running, or storage errors.
    pub async fn record_result(&self, session: &ExamSession) -> Result<i64, ExamError> {
        let result = match session.to_result()? {
            Some(result) => result,
            None if session.is_in_progress() => return Err(ExamError::AlreadyStarted),
            None => return Err(ExamError::NotInProgress),
        };
        let id = self
            .results
            .append_result(&result)
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "failed to persist exam result"))?;
        tracing::info!(
            result_id = id,
            correct = result.correct(),
            total = result.total(),
            reason = %result.reason(),
            "exam result persisted"
        );
        Ok(id)
    }

    fn start_from_bank<R: Rng + ?Sized>(
        &self,
        bank: &[Question],
        filter: &SubjectFilter,
        rng: &mut R,
    ) -> Result<ExamSession, ExamError> {
        let mut session = ExamSession::with_filter(self.settings, filter.clone());
        session.start_with_rng(bank, rng, self.clock.now())?;
        Ok(session)
    }
}
