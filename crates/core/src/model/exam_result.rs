use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::report::{Report, ScoreBand, SubjectScore, percentage};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamResultError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct count ({correct}) exceeds question count ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },

    #[error("answered count ({answered}) exceeds question count ({total})")]
    AnsweredExceedsTotal { answered: u32, total: u32 },

    #[error("question count ({total}) does not match subject totals ({sum})")]
    SubjectTotalMismatch { total: u32, sum: u32 },

    #[error("unknown submit reason: {0}")]
    UnknownReason(String),
}

/// How a session reached `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    /// The candidate pressed submit.
    Manual,
    /// The countdown reached zero.
    TimedOut,
}

impl SubmitReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubmitReason::Manual => "manual",
            SubmitReason::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for SubmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmitReason {
    type Err = ExamResultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "timed_out" => Ok(Self::TimedOut),
            other => Err(ExamResultError::UnknownReason(other.to_string())),
        }
    }
}

/// Aggregate record of a finished exam attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamResult {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    reason: SubmitReason,
    total: u32,
    answered: u32,
    correct: u32,
    by_subject: BTreeMap<String, SubjectScore>,
}

impl ExamResult {
    /// Rehydrate a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ExamResultError` if timestamps are reversed or counts are inconsistent.
    pub fn from_persisted(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        reason: SubmitReason,
        total: u32,
        answered: u32,
        correct: u32,
        by_subject: BTreeMap<String, SubjectScore>,
    ) -> Result<Self, ExamResultError> {
        if completed_at < started_at {
            return Err(ExamResultError::InvalidTimeRange);
        }
        if correct > total {
            return Err(ExamResultError::CorrectExceedsTotal { correct, total });
        }
        if answered > total {
            return Err(ExamResultError::AnsweredExceedsTotal { answered, total });
        }
        let sum = by_subject
            .values()
            .fold(0_u32, |acc, s| acc.saturating_add(s.total));
        if sum != total {
            return Err(ExamResultError::SubjectTotalMismatch { total, sum });
        }

        Ok(Self {
            started_at,
            completed_at,
            reason,
            total,
            answered,
            correct,
            by_subject,
        })
    }

    /// Build a result from a scored report.
    ///
    /// # Errors
    ///
    /// Returns `ExamResultError::InvalidTimeRange` if `completed_at` is before `started_at`.
    pub fn from_report(
        report: &Report,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        reason: SubmitReason,
    ) -> Result<Self, ExamResultError> {
        Self::from_persisted(
            started_at,
            completed_at,
            reason,
            report.total,
            report.answered,
            report.correct,
            report.by_subject.clone(),
        )
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn reason(&self) -> SubmitReason {
        self.reason
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn by_subject(&self) -> &BTreeMap<String, SubjectScore> {
        &self.by_subject
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        percentage(self.correct, self.total)
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.percentage())
    }

    /// Wall-clock seconds between start and completion.
    #[must_use]
    pub fn elapsed_secs(&self) -> i64 {
        (self.completed_at - self.started_at).num_seconds()
    }
}
