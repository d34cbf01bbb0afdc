use thiserror::Error;

use crate::model::{ExamResultError, ExamSettingsError, ParseIdError, QuestionError};

/// Any domain validation failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Settings(#[from] ExamSettingsError),
    #[error(transparent)]
    Result(#[from] ExamResultError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}
