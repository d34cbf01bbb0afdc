mod exam_result;
mod ids;
mod question;
mod report;
mod settings;
mod subject;

pub use ids::{ParseIdError, QuestionId};

pub use exam_result::{ExamResult, ExamResultError, SubmitReason};
pub use question::{Difficulty, ParseDifficultyError, Question, QuestionError, QuestionRecord};
pub use report::{Report, ScoreBand, SubjectScore, percentage};
pub use settings::{DEFAULT_DURATION_SECS, DEFAULT_MAX_QUESTIONS, ExamSettings, ExamSettingsError};
pub use subject::SubjectFilter;
