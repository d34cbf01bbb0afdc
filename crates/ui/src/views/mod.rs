mod exam;
mod history;
mod result;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use exam::ExamView;
pub use history::HistoryView;
pub use result::{ReportPanel, ResultView};
pub use state::{ViewError, ViewState, view_state_from_resource};
