mod observer;
mod plan;
mod progress;
mod session;
mod timer;
mod view;
mod workflow;

// Public API of the exam subsystem.
pub use crate::error::ExamError;
pub use observer::{ExamObserver, NoopObserver};
pub use plan::{PaperBuilder, estimate_paper_size};
pub use progress::ExamProgress;
pub use session::{ExamPhase, ExamSession, TickOutcome};
pub use timer::{ExamTimer, LiveExam, TICK_PERIOD};
pub use view::{ExamHistoryService, ExamResultId, ExamResultListItem};
pub use workflow::{ExamLoopService, ExamSubmission};
