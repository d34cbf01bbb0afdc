#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod exams;
pub mod question_bank;
pub mod question_source;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ExamError, QuestionBankError, QuestionSourceError};
pub use exams::{
    ExamHistoryService, ExamLoopService, ExamObserver, ExamPhase, ExamProgress,
    ExamResultListItem, ExamSession, ExamSubmission, LiveExam, NoopObserver, PaperBuilder,
    TickOutcome,
};
pub use question_bank::QuestionBankService;
pub use question_source::{HttpQuestionSource, QuestionSource, QuestionSourceConfig};
