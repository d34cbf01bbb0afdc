use exam_core::model::{Question, Report};

/// Presentation hooks invoked by `LiveExam` after each action and timer tick.
///
/// Every hook defaults to a no-op so observers implement only what they render.
pub trait ExamObserver: Send + Sync {
    /// The question under the cursor and the option chosen for it, if any.
    fn render_question(&self, _position: usize, _question: &Question, _selected: Option<usize>) {}

    /// Answered positions in ascending order, the cursor, and the paper length.
    fn render_navigator(&self, _answered: &[usize], _cursor: usize, _len: usize) {}

    fn render_timer(&self, _remaining_secs: u32) {}

    fn render_report(&self, _report: &Report) {}
}

/// Observer that renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExamObserver for NoopObserver {}
