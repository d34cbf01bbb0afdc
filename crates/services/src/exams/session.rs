use chrono::{DateTime, Utc};
use rand::Rng;

use exam_core::countdown::{Countdown, CountdownTick};
use exam_core::model::{
    ExamResult, ExamSettings, Question, Report, SubjectFilter, SubmitReason,
};
use exam_core::scoring::{AnswerSheet, score};

use super::plan::PaperBuilder;
use super::progress::ExamProgress;
use crate::error::ExamError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a single exam attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamPhase {
    Selecting,
    InProgress,
    Finished,
}

/// Result of delivering one timer tick to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time remains; carries the new remaining seconds.
    Running(u32),
    /// This tick reached zero and submitted the exam.
    Expired,
    /// The session was not in progress; nothing changed.
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory exam attempt.
///
/// Starts in `Selecting`, where the subject filter can be edited. `start`
/// fixes the paper for the lifetime of the attempt. A finished session is
/// terminal; a new attempt is a new `ExamSession`.
#[derive(Debug, Clone)]
pub struct ExamSession {
    settings: ExamSettings,
    filter: SubjectFilter,
    phase: ExamPhase,
    paper: Vec<Question>,
    answers: AnswerSheet,
    cursor: usize,
    countdown: Countdown,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    reason: Option<SubmitReason>,
}

impl ExamSession {
    #[must_use]
    pub fn new(settings: ExamSettings) -> Self {
        Self::with_filter(settings, SubjectFilter::all())
    }

    #[must_use]
    pub fn with_filter(settings: ExamSettings, filter: SubjectFilter) -> Self {
        Self {
            settings,
            filter,
            phase: ExamPhase::Selecting,
            paper: Vec::new(),
            answers: AnswerSheet::new(),
            cursor: 0,
            countdown: Countdown::new(settings.duration_secs()),
            started_at: None,
            finished_at: None,
            reason: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> ExamSettings {
        self.settings
    }

    #[must_use]
    pub fn filter(&self) -> &SubjectFilter {
        &self.filter
    }

    #[must_use]
    pub fn phase(&self) -> ExamPhase {
        self.phase
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.phase == ExamPhase::InProgress
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == ExamPhase::Finished
    }

    #[must_use]
    pub fn paper(&self) -> &[Question] {
        &self.paper
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn answer_at(&self, position: usize) -> Option<usize> {
        self.answers.get(&position).copied()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.paper.get(self.cursor)
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn submit_reason(&self) -> Option<SubmitReason> {
        self.reason
    }

    /// Add or remove a subject from the filter.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::AlreadyStarted` once the paper is fixed.
    pub fn toggle_subject(&mut self, subject: &str) -> Result<bool, ExamError> {
        if self.phase != ExamPhase::Selecting {
            return Err(ExamError::AlreadyStarted);
        }
        Ok(self.filter.toggle(subject))
    }

    /// Build the paper from `bank` with the thread-local RNG and start the clock.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::AlreadyStarted` if the session left `Selecting`.
    pub fn start(&mut self, bank: &[Question], now: DateTime<Utc>) -> Result<(), ExamError> {
        let mut rng = rand::rng();
        self.start_with_rng(bank, &mut rng, now)
    }

    /// Build the paper with an injected RNG and start the clock.
    ///
    /// An empty pool still starts the session with an empty paper.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::AlreadyStarted` if the session left `Selecting`.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        bank: &[Question],
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<(), ExamError> {
        let paper = PaperBuilder::new(&self.filter, &self.settings).build_with_rng(bank, rng);
        self.start_with_paper(paper, now)
    }

    /// Start with a prepared paper. The paper is truncated to the configured maximum.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::AlreadyStarted` if the session left `Selecting`.
    pub fn start_with_paper(
        &mut self,
        mut paper: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<(), ExamError> {
        if self.phase != ExamPhase::Selecting {
            return Err(ExamError::AlreadyStarted);
        }
        paper.truncate(self.settings.max_paper_len());
        self.paper = paper;
        self.answers.clear();
        self.cursor = 0;
        self.countdown = Countdown::new(self.settings.duration_secs());
        self.started_at = Some(now);
        self.phase = ExamPhase::InProgress;
        tracing::info!(
            questions = self.paper.len(),
            duration_secs = self.settings.duration_secs(),
            "exam started"
        );
        Ok(())
    }

    /// Record `option` as the answer at `position`, overwriting any previous choice.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::PositionOutOfRange` or `ExamError::OptionOutOfRange`
    /// for invalid input, or a phase error when not in progress.
    pub fn select_answer(&mut self, position: usize, option: usize) -> Result<(), ExamError> {
        self.ensure_in_progress()?;
        let question = self.question_at(position)?;
        if !question.has_option(option) {
            let options = question.options().len();
            tracing::warn!(position, option, options, "rejected answer option");
            return Err(ExamError::OptionOutOfRange {
                position,
                option,
                options,
            });
        }
        self.answers.insert(position, option);
        Ok(())
    }

    /// Answer the question under the cursor.
    ///
    /// # Errors
    ///
    /// Same as `select_answer`.
    pub fn select_current(&mut self, option: usize) -> Result<(), ExamError> {
        self.select_answer(self.cursor, option)
    }

    /// Remove the answer at `position`. Returns whether an answer was removed.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::PositionOutOfRange` or a phase error.
    pub fn clear_answer(&mut self, position: usize) -> Result<bool, ExamError> {
        self.ensure_in_progress()?;
        self.question_at(position)?;
        Ok(self.answers.remove(&position).is_some())
    }

    /// Move to the next question, staying on the last one.
    ///
    /// # Errors
    ///
    /// Returns a phase error when not in progress.
    pub fn next(&mut self) -> Result<usize, ExamError> {
        self.ensure_in_progress()?;
        let last = self.paper.len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(last);
        tracing::debug!(cursor = self.cursor, "exam cursor moved");
        Ok(self.cursor)
    }

    /// Move to the previous question, staying on the first one.
    ///
    /// # Errors
    ///
    /// Returns a phase error when not in progress.
    pub fn previous(&mut self) -> Result<usize, ExamError> {
        self.ensure_in_progress()?;
        self.cursor = self.cursor.saturating_sub(1);
        tracing::debug!(cursor = self.cursor, "exam cursor moved");
        Ok(self.cursor)
    }

    /// Move the cursor to `position`.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::PositionOutOfRange` if `position >= len`, or a phase error.
    pub fn jump_to(&mut self, position: usize) -> Result<usize, ExamError> {
        self.ensure_in_progress()?;
        self.question_at(position)?;
        self.cursor = position;
        tracing::debug!(cursor = self.cursor, "exam cursor jumped");
        Ok(self.cursor)
    }

    /// Finish the exam by explicit request and return the report.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::AlreadyFinished` or `ExamError::NotInProgress`.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<Report, ExamError> {
        self.ensure_in_progress()?;
        self.finish(SubmitReason::Manual, now);
        Ok(score(&self.paper, &self.answers))
    }

    /// Deliver one second of elapsed time.
    ///
    /// The tick that reaches zero submits the exam with the answers as they stand.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.phase != ExamPhase::InProgress {
            return TickOutcome::Ignored;
        }
        match self.countdown.tick() {
            CountdownTick::Running(remaining) => TickOutcome::Running(remaining),
            CountdownTick::Expired => {
                self.finish(SubmitReason::TimedOut, now);
                TickOutcome::Expired
            }
            CountdownTick::Stopped => TickOutcome::Ignored,
        }
    }

    #[must_use]
    pub fn progress(&self) -> ExamProgress {
        let total = self.paper.len();
        let answered = self.answers.len();
        ExamProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            cursor: self.cursor,
            is_last: total == 0 || self.cursor + 1 >= total,
        }
    }

    /// Score of the finished attempt; `None` until the session is finished.
    #[must_use]
    pub fn report(&self) -> Option<Report> {
        self.is_finished().then(|| score(&self.paper, &self.answers))
    }

    /// Persistable summary of the finished attempt; `None` until finished.
    ///
    /// # Errors
    ///
    /// Propagates `ExamResultError` through `ExamError::Result`.
    pub fn to_result(&self) -> Result<Option<ExamResult>, ExamError> {
        let (Some(report), Some(started_at), Some(finished_at), Some(reason)) =
            (self.report(), self.started_at, self.finished_at, self.reason)
        else {
            return Ok(None);
        };
        Ok(Some(ExamResult::from_report(
            &report,
            started_at,
            finished_at,
            reason,
        )?))
    }

    fn finish(&mut self, reason: SubmitReason, now: DateTime<Utc>) {
        self.countdown.stop();
        self.phase = ExamPhase::Finished;
        self.finished_at = Some(now);
        self.reason = Some(reason);
        tracing::info!(
            reason = %reason,
            answered = self.answers.len(),
            questions = self.paper.len(),
            remaining_secs = self.countdown.remaining(),
            "exam finished"
        );
    }

    fn ensure_in_progress(&self) -> Result<(), ExamError> {
        match self.phase {
            ExamPhase::InProgress => Ok(()),
            ExamPhase::Selecting => Err(ExamError::NotInProgress),
            ExamPhase::Finished => Err(ExamError::AlreadyFinished),
        }
    }

    fn question_at(&self, position: usize) -> Result<&Question, ExamError> {
        self.paper.get(position).ok_or_else(|| {
            tracing::warn!(position, len = self.paper.len(), "rejected exam position");
            ExamError::PositionOutOfRange {
                position,
                len: self.paper.len(),
            }
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
