use std::sync::{Arc, Mutex};

use dioxus::prelude::*;
use dioxus_router::Link;

use exam_core::model::{ExamSettings, Report, SubjectFilter};
use services::exams::ExamResultId;
use services::{ExamError, ExamLoopService, ExamObserver, ExamPhase, ExamSession, LiveExam};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ReportPanel, ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    ExamIntent, ExamVm, NavigatorCellVm, OptionVm, ReportVm, SubjectOptionVm,
    map_subject_options, selection_label,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Mirrors a live exam into the signals the view renders from.
///
/// Timer ticks arrive from the countdown task, so every signal here is sync.
struct SignalObserver {
    shared: Arc<Mutex<ExamSession>>,
    session: SyncSignal<ExamSession>,
    saved: SyncSignal<Option<ExamResultId>>,
    error: SyncSignal<Option<ViewError>>,
    exam_loop: Arc<ExamLoopService>,
}

impl SignalObserver {
    fn mirror(&self) -> Option<ExamSession> {
        let Ok(guard) = self.shared.lock() else {
            tracing::warn!("exam session lock poisoned, view not refreshed");
            return None;
        };
        let snapshot = guard.clone();
        drop(guard);
        let mut session = self.session;
        session.set(snapshot.clone());
        Some(snapshot)
    }
}

impl ExamObserver for SignalObserver {
    fn render_navigator(&self, _answered: &[usize], _cursor: usize, _len: usize) {
        self.mirror();
    }

    fn render_timer(&self, _remaining_secs: u32) {
        self.mirror();
    }

    fn render_report(&self, report: &Report) {
        let Some(snapshot) = self.mirror() else {
            return;
        };
        tracing::info!(
            correct = report.correct,
            total = report.total,
            "exam finished, saving result"
        );
        let exam_loop = Arc::clone(&self.exam_loop);
        let mut saved = self.saved;
        let mut error = self.error;
        tokio::spawn(async move {
            match exam_loop.record_result(&snapshot).await {
                Ok(id) => saved.set(Some(id)),
                Err(err) => error.set(Some(ViewError::from(err))),
            }
        });
    }
}

#[component]
pub fn ExamView() -> Element {
    let ctx = use_context::<AppContext>();
    let exam_loop = ctx.exam_loop();
    let settings = ctx.exam_settings();
    let clock = exam_loop.clock();

    let session = use_signal_sync(|| ExamSession::new(settings));
    let error = use_signal_sync(|| None::<ViewError>);
    let saved = use_signal_sync(|| None::<ExamResultId>);
    let live = use_signal(|| None::<LiveExam>);
    // Bumped by every start and retake; a start whose generation is stale is dropped.
    let generation = use_signal(|| 0_u64);
    let starting = use_signal(|| false);

    let filter = use_memo(move || session.read().filter().clone());

    let subjects_resource = {
        let exam_loop = exam_loop.clone();
        use_resource(move || {
            let exam_loop = exam_loop.clone();
            async move { exam_loop.list_subjects().await.map_err(ViewError::from) }
        })
    };
    let estimate_resource = {
        let exam_loop = exam_loop.clone();
        use_resource(move || {
            let exam_loop = exam_loop.clone();
            let filter = filter();
            async move { exam_loop.estimate(&filter).await.map_err(ViewError::from) }
        })
    };

    let dispatch = {
        let exam_loop = exam_loop.clone();
        use_callback(move |intent: ExamIntent| {
            let mut session = session;
            let mut error = error;
            let mut saved = saved;
            let mut live = live;
            let mut generation = generation;
            let mut starting = starting;

            let with_live = move |action: &dyn Fn(&LiveExam) -> Result<(), ExamError>| {
                live.peek()
                    .as_ref()
                    .map_or(Err(ExamError::NotInProgress), action)
            };

            let outcome = match intent {
                ExamIntent::ToggleSubject(subject) => {
                    session.write().toggle_subject(&subject).map(|_| ())
                }
                ExamIntent::Start if *starting.peek() => Err(ExamError::AlreadyStarted),
                ExamIntent::Start if session.peek().phase() != ExamPhase::Selecting => {
                    Err(ExamError::AlreadyStarted)
                }
                ExamIntent::Start => {
                    starting.set(true);
                    generation += 1;
                    let ticket = *generation.peek();
                    let exam_loop = exam_loop.clone();
                    let filter = session.peek().filter().clone();
                    spawn(async move {
                        let started = exam_loop.start_exam(&filter).await;
                        if *generation.peek() != ticket {
                            tracing::debug!(ticket, "dropping superseded exam start");
                            return;
                        }
                        starting.set(false);
                        let shared = match started {
                            Ok(started) => Arc::new(Mutex::new(started)),
                            Err(err) => {
                                error.set(Some(ViewError::from(err)));
                                return;
                            }
                        };
                        saved.set(None);
                        error.set(None);
                        let observer = Arc::new(SignalObserver {
                            shared: Arc::clone(&shared),
                            session,
                            saved,
                            error,
                            exam_loop,
                        });
                        match LiveExam::start_shared(shared, observer, clock) {
                            Ok(exam) => live.set(Some(exam)),
                            Err(err) => error.set(Some(ViewError::from(err))),
                        }
                    });
                    Ok(())
                }
                ExamIntent::Select(option) => with_live(&|exam| exam.select_current(option)),
                ExamIntent::Clear => with_live(&|exam| {
                    let cursor = exam.snapshot()?.cursor();
                    exam.clear_answer(cursor).map(|_| ())
                }),
                ExamIntent::Previous => with_live(&|exam| exam.previous().map(|_| ())),
                ExamIntent::Next => with_live(&|exam| exam.next().map(|_| ())),
                ExamIntent::Jump(position) => with_live(&|exam| exam.jump_to(position).map(|_| ())),
                ExamIntent::Submit => live
                    .write()
                    .as_mut()
                    .map_or(Err(ExamError::NotInProgress), |exam| exam.submit().map(|_| ())),
                ExamIntent::Retake => {
                    generation += 1;
                    starting.set(false);
                    // Dropping the live exam aborts its countdown.
                    live.set(None);
                    let filter = session.peek().filter().clone();
                    session.set(ExamSession::with_filter(settings, filter));
                    saved.set(None);
                    error.set(None);
                    Ok(())
                }
            };

            if let Err(err) = outcome {
                tracing::warn!(error = %err, "exam action rejected");
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<ExamTestHandles>() {
                handles.register(dispatch, session, live);
            }
        }
    }

    let phase = session.read().phase();

    rsx! {
        div { class: "page exam",
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }

            match phase {
                ExamPhase::Selecting => rsx! {
                    SelectionPanel {
                        subjects: view_state_from_resource(&subjects_resource),
                        estimate: view_state_from_resource(&estimate_resource),
                        filter: filter(),
                        settings,
                        starting: starting(),
                        dispatch,
                    }
                },
                ExamPhase::InProgress => match ExamVm::from_session(&session.read()) {
                    Some(vm) => rsx! {
                        QuestionPanel { vm, dispatch }
                    },
                    None => rsx! {
                        p { "No questions match the selected subjects." }
                        button {
                            r#type: "button",
                            onclick: move |_| dispatch.call(ExamIntent::Retake),
                            "Back to selection"
                        }
                    },
                },
                ExamPhase::Finished => {
                    let report = session.read().report().map(|report| ReportVm::from(&report));
                    rsx! {
                        h2 { "Exam Results" }
                        if let Some(report) = report {
                            ReportPanel { report }
                        }
                        div { class: "actions",
                            button {
                                r#type: "button",
                                class: "primary",
                                onclick: move |_| dispatch.call(ExamIntent::Retake),
                                "Retake Exam"
                            }
                            if let Some(result_id) = saved() {
                                Link { to: Route::Result { result_id }, "View saved result" }
                            }
                            Link { to: Route::History {}, "History" }
                        }
                    }
                }
            }
        }
    }
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

#[component]
fn SelectionPanel(
    subjects: ViewState<Vec<String>>,
    estimate: ViewState<usize>,
    filter: SubjectFilter,
    settings: ExamSettings,
    starting: bool,
    dispatch: Callback<ExamIntent>,
) -> Element {
    let minutes = settings.duration_secs() / 60;
    let max_questions = settings.max_questions();
    let selected = selection_label(&filter);
    let estimate_label = match estimate {
        ViewState::Ready(count) => count.to_string(),
        ViewState::Error(_) => "?".to_string(),
        ViewState::Idle | ViewState::Loading => "...".to_string(),
    };

    rsx! {
        h2 { "Select Your Exam Focus" }
        p {
            "Choose specific subjects to focus on, or leave all unselected for an exam covering every subject."
        }

        match subjects {
            ViewState::Idle => rsx! {
                p { "Idle" }
            },
            ViewState::Loading => rsx! {
                p { "Loading..." }
            },
            ViewState::Ready(subjects) => {
                let options = map_subject_options(&subjects, &filter);
                rsx! {
                    div { class: "subject-grid",
                        for option in options {
                            SubjectCheckbox { key: "{option.name}", option, dispatch }
                        }
                    }
                }
            }
            ViewState::Error(err) => rsx! {
                p { class: "error", "{err.message()}" }
            },
        }

        div { class: "details",
            ul {
                li { "Up to {max_questions} questions from selected subjects" }
                li { "{minutes} minutes total time limit" }
                li { "Multiple choice format" }
            }
            p { "Selected: {selected}" }
            p { "Estimated Questions: {estimate_label}" }
        }

        button {
            r#type: "button",
            class: "primary",
            disabled: starting,
            onclick: move |_| dispatch.call(ExamIntent::Start),
            if starting { "Starting..." } else { "Start Exam" }
        }
    }
}

#[component]
fn SubjectCheckbox(option: SubjectOptionVm, dispatch: Callback<ExamIntent>) -> Element {
    let name = option.name.clone();
    rsx! {
        label { class: "subject-option",
            input {
                r#type: "checkbox",
                checked: option.selected,
                onchange: move |_| dispatch.call(ExamIntent::ToggleSubject(name.clone())),
            }
            span { "{option.name}" }
        }
    }
}

//
// ─── IN PROGRESS ───────────────────────────────────────────────────────────────
//

#[component]
fn QuestionPanel(vm: ExamVm, dispatch: Callback<ExamIntent>) -> Element {
    let timer_class = if vm.low_time { "timer timer--low" } else { "timer" };

    rsx! {
        div { class: "exam-layout",
            section { class: "question-panel",
                div { class: "question-header",
                    h2 { "{vm.question.heading}" }
                    span { class: timer_class, "{vm.timer_label}" }
                }
                div { class: "question-tags",
                    span { class: "badge", "{vm.question.subject}" }
                    span { class: vm.question.difficulty_class, "{vm.question.difficulty}" }
                }
                p { class: "prompt", "{vm.question.prompt}" }
                div { class: "options",
                    for option in vm.question.options {
                        AnswerOption { key: "{option.index}", option, dispatch }
                    }
                }
                div { class: "actions",
                    button {
                        r#type: "button",
                        disabled: vm.is_first,
                        onclick: move |_| dispatch.call(ExamIntent::Previous),
                        "Previous"
                    }
                    button {
                        r#type: "button",
                        disabled: !vm.has_answer,
                        onclick: move |_| dispatch.call(ExamIntent::Clear),
                        "Clear"
                    }
                    if vm.is_last {
                        button {
                            r#type: "button",
                            class: "primary",
                            onclick: move |_| dispatch.call(ExamIntent::Submit),
                            "Submit Exam"
                        }
                    } else {
                        button {
                            r#type: "button",
                            class: "primary",
                            onclick: move |_| dispatch.call(ExamIntent::Next),
                            "Next"
                        }
                    }
                }
            }
            aside { class: "navigator",
                h3 { "Question Progress" }
                div { class: "nav-grid",
                    for cell in vm.navigator {
                        NavigatorCell { key: "{cell.position}", cell, dispatch }
                    }
                }
                p { "{vm.progress_label}" }
                button {
                    r#type: "button",
                    onclick: move |_| dispatch.call(ExamIntent::Submit),
                    "Submit Now"
                }
            }
        }
    }
}

#[component]
fn AnswerOption(option: OptionVm, dispatch: Callback<ExamIntent>) -> Element {
    let index = option.index;
    let class = if option.selected { "option option--selected" } else { "option" };
    rsx! {
        label { class,
            input {
                r#type: "radio",
                name: "answer",
                checked: option.selected,
                onchange: move |_| dispatch.call(ExamIntent::Select(index)),
            }
            span { "{option.label}" }
        }
    }
}

#[component]
fn NavigatorCell(cell: NavigatorCellVm, dispatch: Callback<ExamIntent>) -> Element {
    let position = cell.position;
    rsx! {
        button {
            r#type: "button",
            class: cell.class(),
            onclick: move |_| dispatch.call(ExamIntent::Jump(position)),
            "{cell.number}"
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ExamTestHandles {
    dispatch: Rc<RefCell<Option<Callback<ExamIntent>>>>,
    session: Rc<RefCell<Option<SyncSignal<ExamSession>>>>,
    live: Rc<RefCell<Option<Signal<Option<LiveExam>>>>>,
}

#[cfg(test)]
impl ExamTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<ExamIntent>,
        session: SyncSignal<ExamSession>,
        live: Signal<Option<LiveExam>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.session.borrow_mut() = Some(session);
        *self.live.borrow_mut() = Some(live);
    }

    pub(crate) fn dispatch(&self) -> Callback<ExamIntent> {
        (*self.dispatch.borrow()).expect("exam dispatch registered")
    }

    pub(crate) fn session(&self) -> SyncSignal<ExamSession> {
        (*self.session.borrow()).expect("exam session registered")
    }

    pub(crate) fn live(&self) -> Signal<Option<LiveExam>> {
        (*self.live.borrow()).expect("live exam registered")
    }
}
