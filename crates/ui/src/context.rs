use std::sync::Arc;

use exam_core::model::ExamSettings;
use services::{ExamHistoryService, ExamLoopService};

pub trait UiApp: Send + Sync {
    fn exam_settings(&self) -> ExamSettings;

    fn exam_loop(&self) -> Arc<ExamLoopService>;
    fn exam_history(&self) -> Arc<ExamHistoryService>;
}

#[derive(Clone)]
pub struct AppContext {
    exam_settings: ExamSettings,

    exam_loop: Arc<ExamLoopService>,
    exam_history: Arc<ExamHistoryService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            exam_settings: app.exam_settings(),
            exam_loop: app.exam_loop(),
            exam_history: app.exam_history(),
        }
    }

    #[must_use]
    pub fn exam_settings(&self) -> ExamSettings {
        self.exam_settings
    }

    #[must_use]
    pub fn exam_loop(&self) -> Arc<ExamLoopService> {
        Arc::clone(&self.exam_loop)
    }

    #[must_use]
    pub fn exam_history(&self) -> Arc<ExamHistoryService> {
        Arc::clone(&self.exam_history)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
