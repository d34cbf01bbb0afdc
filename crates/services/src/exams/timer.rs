use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use exam_core::model::{Question, Report};

use super::observer::ExamObserver;
use super::session::{ExamPhase, ExamSession, TickOutcome};
use crate::Clock;
use crate::error::ExamError;

/// Real-time period between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

//
// ─── TIMER TASK ────────────────────────────────────────────────────────────────
//

/// Cancellable countdown task driving a shared session.
///
/// The task ends on its own once the session leaves `InProgress`. Dropping the
/// timer aborts the task.
pub struct ExamTimer {
    handle: JoinHandle<()>,
}

impl ExamTimer {
    /// Spawn the countdown onto the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(
        session: Arc<Mutex<ExamSession>>,
        observer: Arc<dyn ExamObserver>,
        clock: Clock,
        period: Duration,
    ) -> Self {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(run_countdown(session, observer, clock, period));
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ExamTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_countdown(
    session: Arc<Mutex<ExamSession>>,
    observer: Arc<dyn ExamObserver>,
    clock: Clock,
    period: Duration,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let (outcome, report) = {
            let Ok(mut guard) = session.lock() else {
                tracing::warn!("exam session lock poisoned, stopping timer");
                return;
            };
            let outcome = guard.tick(clock.now());
            let report = match outcome {
                TickOutcome::Expired => guard.report(),
                _ => None,
            };
            (outcome, report)
        };

        match outcome {
            TickOutcome::Running(remaining) => observer.render_timer(remaining),
            TickOutcome::Expired => {
                tracing::info!("exam time expired, submitted automatically");
                observer.render_timer(0);
                if let Some(report) = report {
                    observer.render_report(&report);
                }
                return;
            }
            TickOutcome::Ignored => return,
        }
    }
}

//
// ─── LIVE EXAM ─────────────────────────────────────────────────────────────────
//

/// A running exam: the shared session, its countdown task, and an observer.
///
/// Every action notifies the observer with the question under the cursor and
/// the navigator state. Submitting or dropping the `LiveExam` stops the timer.
pub struct LiveExam {
    session: Arc<Mutex<ExamSession>>,
    observer: Arc<dyn ExamObserver>,
    clock: Clock,
    period: Duration,
    timer: Option<ExamTimer>,
}

struct RenderView {
    position: usize,
    question: Option<Question>,
    selected: Option<usize>,
    answered: Vec<usize>,
    len: usize,
}

impl RenderView {
    fn capture(session: &ExamSession) -> Self {
        Self {
            position: session.cursor(),
            question: session.current_question().cloned(),
            selected: session.answer_at(session.cursor()),
            answered: session.answers().keys().copied().collect(),
            len: session.paper().len(),
        }
    }
}

impl LiveExam {
    /// Wrap a started session and spawn its countdown with the default period.
    ///
    /// # Errors
    ///
    /// Returns a phase error if `session` is not in progress.
    pub fn start(
        session: ExamSession,
        observer: Arc<dyn ExamObserver>,
        clock: Clock,
    ) -> Result<Self, ExamError> {
        Self::start_with_period(session, observer, clock, TICK_PERIOD)
    }

    /// Wrap a started session and spawn its countdown with a custom period.
    ///
    /// # Errors
    ///
    /// Returns a phase error if `session` is not in progress.
    pub fn start_with_period(
        session: ExamSession,
        observer: Arc<dyn ExamObserver>,
        clock: Clock,
        period: Duration,
    ) -> Result<Self, ExamError> {
        ensure_running(&session)?;
        Self::attach(Arc::new(Mutex::new(session)), observer, clock, period)
    }

    /// Drive a started session the caller already shares, e.g. with its observer.
    ///
    /// # Errors
    ///
    /// Returns a phase error if the session is not in progress, or
    /// `ExamError::Poisoned` if its lock is poisoned.
    pub fn start_shared(
        session: Arc<Mutex<ExamSession>>,
        observer: Arc<dyn ExamObserver>,
        clock: Clock,
    ) -> Result<Self, ExamError> {
        ensure_running(&*session.lock().map_err(|_| ExamError::Poisoned)?)?;
        Self::attach(session, observer, clock, TICK_PERIOD)
    }

    fn attach(
        session: Arc<Mutex<ExamSession>>,
        observer: Arc<dyn ExamObserver>,
        clock: Clock,
        period: Duration,
    ) -> Result<Self, ExamError> {
        let mut live = Self {
            session,
            observer,
            clock,
            period,
            timer: None,
        };
        live.spawn_timer();
        live.render_initial()?;
        Ok(live)
    }

    /// Replace the attempt with a new started session and restart the timer.
    ///
    /// # Errors
    ///
    /// Returns a phase error if `next` is not in progress; the current attempt is kept.
    pub fn restart(&mut self, next: ExamSession) -> Result<(), ExamError> {
        ensure_running(&next)?;
        self.stop_timer();
        self.session = Arc::new(Mutex::new(next));
        self.spawn_timer();
        self.render_initial()
    }

    /// Handle to the shared session, e.g. for rendering a snapshot.
    #[must_use]
    pub fn shared_session(&self) -> Arc<Mutex<ExamSession>> {
        Arc::clone(&self.session)
    }

    /// Copy of the current session state.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Poisoned` if the session lock is poisoned.
    pub fn snapshot(&self) -> Result<ExamSession, ExamError> {
        Ok(self.lock()?.clone())
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// # Errors
    ///
    /// See `ExamSession::select_answer`.
    pub fn select_answer(&self, position: usize, option: usize) -> Result<(), ExamError> {
        self.act(|s| s.select_answer(position, option))
    }

    /// # Errors
    ///
    /// See `ExamSession::select_current`.
    pub fn select_current(&self, option: usize) -> Result<(), ExamError> {
        self.act(|s| s.select_current(option))
    }

    /// # Errors
    ///
    /// See `ExamSession::clear_answer`.
    pub fn clear_answer(&self, position: usize) -> Result<bool, ExamError> {
        self.act(|s| s.clear_answer(position))
    }

    /// # Errors
    ///
    /// See `ExamSession::next`.
    pub fn next(&self) -> Result<usize, ExamError> {
        self.act(ExamSession::next)
    }

    /// # Errors
    ///
    /// See `ExamSession::previous`.
    pub fn previous(&self) -> Result<usize, ExamError> {
        self.act(ExamSession::previous)
    }

    /// # Errors
    ///
    /// See `ExamSession::jump_to`.
    pub fn jump_to(&self, position: usize) -> Result<usize, ExamError> {
        self.act(|s| s.jump_to(position))
    }

    /// Submit the exam, stop the countdown, and render the report.
    ///
    /// # Errors
    ///
    /// Returns a phase error if the exam already finished (for example on timeout).
    pub fn submit(&mut self) -> Result<Report, ExamError> {
        let report = {
            let mut guard = self.lock()?;
            guard.submit(self.clock.now())?
        };
        self.stop_timer();
        self.observer.render_report(&report);
        Ok(report)
    }

    fn spawn_timer(&mut self) {
        self.timer = Some(ExamTimer::spawn(
            Arc::clone(&self.session),
            Arc::clone(&self.observer),
            self.clock,
            self.period,
        ));
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ExamSession>, ExamError> {
        self.session.lock().map_err(|_| ExamError::Poisoned)
    }

    fn act<T>(
        &self,
        action: impl FnOnce(&mut ExamSession) -> Result<T, ExamError>,
    ) -> Result<T, ExamError> {
        let (value, view) = {
            let mut guard = self.lock()?;
            let value = action(&mut guard)?;
            (value, RenderView::capture(&guard))
        };
        self.render(&view);
        Ok(value)
    }

    fn render_initial(&self) -> Result<(), ExamError> {
        let (view, remaining) = {
            let guard = self.lock()?;
            (RenderView::capture(&guard), guard.remaining_secs())
        };
        self.render(&view);
        self.observer.render_timer(remaining);
        Ok(())
    }

    fn render(&self, view: &RenderView) {
        if let Some(question) = &view.question {
            self.observer
                .render_question(view.position, question, view.selected);
        }
        self.observer
            .render_navigator(&view.answered, view.position, view.len);
    }
}

fn ensure_running(session: &ExamSession) -> Result<(), ExamError> {
    match session.phase() {
        ExamPhase::InProgress => Ok(()),
        ExamPhase::Selecting => Err(ExamError::NotInProgress),
        ExamPhase::Finished => Err(ExamError::AlreadyFinished),
    }
}
