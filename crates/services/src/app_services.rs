use std::sync::Arc;

use exam_core::model::ExamSettings;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::exams::{ExamHistoryService, ExamLoopService};
use crate::question_bank::QuestionBankService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    settings: ExamSettings,
    exam_loop: Arc<ExamLoopService>,
    exam_history: Arc<ExamHistoryService>,
    question_bank: Arc<QuestionBankService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// Seeds the built-in sample bank when the database holds no questions.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or seeding fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: ExamSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let services = Self::from_storage(&storage, clock, settings);
        services.ensure_question_bank().await?;
        Ok(services)
    }

    /// Build services over in-memory storage seeded with the sample bank.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if seeding fails.
    pub async fn in_memory(clock: Clock, settings: ExamSettings) -> Result<Self, AppServicesError> {
        let services = Self::from_storage(&Storage::in_memory(), clock, settings);
        services.ensure_question_bank().await?;
        Ok(services)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, settings: ExamSettings) -> Self {
        let exam_loop = Arc::new(ExamLoopService::new(
            clock,
            settings,
            Arc::clone(&storage.questions),
            Arc::clone(&storage.results),
        ));
        let exam_history = Arc::new(ExamHistoryService::new(
            clock,
            Arc::clone(&storage.results),
        ));
        let question_bank = Arc::new(QuestionBankService::new(Arc::clone(&storage.questions)));

        Self {
            settings,
            exam_loop,
            exam_history,
            question_bank,
        }
    }

    #[must_use]
    pub fn settings(&self) -> ExamSettings {
        self.settings
    }

    #[must_use]
    pub fn exam_loop(&self) -> Arc<ExamLoopService> {
        Arc::clone(&self.exam_loop)
    }

    #[must_use]
    pub fn exam_history(&self) -> Arc<ExamHistoryService> {
        Arc::clone(&self.exam_history)
    }

    #[must_use]
    pub fn question_bank(&self) -> Arc<QuestionBankService> {
        Arc::clone(&self.question_bank)
    }

    async fn ensure_question_bank(&self) -> Result<(), AppServicesError> {
        if self.question_bank.count().await? == 0 {
            self.question_bank.seed_sample().await?;
        }
        Ok(())
    }
}
