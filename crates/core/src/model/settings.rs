use thiserror::Error;

/// Maximum number of questions on a paper in the reference configuration.
pub const DEFAULT_MAX_QUESTIONS: u32 = 20;

/// Length of an exam session in seconds in the reference configuration.
pub const DEFAULT_DURATION_SECS: u32 = 3600;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamSettingsError {
    #[error("max questions must be > 0")]
    InvalidMaxQuestions,

    #[error("exam duration must be > 0 seconds")]
    InvalidDuration,
}

/// Configuration applied to every exam session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSettings {
    max_questions: u32,
    duration_secs: u32,
}

impl ExamSettings {
    /// Reference settings: 20 questions, 60 minutes.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            max_questions: DEFAULT_MAX_QUESTIONS,
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    /// Creates custom exam settings.
    ///
    /// # Errors
    ///
    /// Returns `ExamSettingsError` if either value is zero.
    pub fn new(max_questions: u32, duration_secs: u32) -> Result<Self, ExamSettingsError> {
        if max_questions == 0 {
            return Err(ExamSettingsError::InvalidMaxQuestions);
        }
        if duration_secs == 0 {
            return Err(ExamSettingsError::InvalidDuration);
        }
        Ok(Self {
            max_questions,
            duration_secs,
        })
    }

    #[must_use]
    pub fn max_questions(&self) -> u32 {
        self.max_questions
    }

    /// `max_questions` as a slice length.
    #[must_use]
    pub fn max_paper_len(&self) -> usize {
        usize::try_from(self.max_questions).unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self::reference()
    }
}
