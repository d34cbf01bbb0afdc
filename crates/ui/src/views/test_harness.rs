use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use exam_core::model::ExamSettings;
use exam_core::time::fixed_now;
use services::{
    Clock, ExamHistoryService, ExamLoopService, ExamSession, LiveExam, QuestionBankService,
};
use storage::repository::{ExamResultRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::exam::ExamTestHandles;
use crate::views::{ExamView, HistoryView, ResultView};
use crate::vm::ExamIntent;

#[derive(Clone)]
struct TestApp {
    settings: ExamSettings,
    exam_loop: Arc<ExamLoopService>,
    exam_history: Arc<ExamHistoryService>,
}

impl UiApp for TestApp {
    fn exam_settings(&self) -> ExamSettings {
        self.settings
    }

    fn exam_loop(&self) -> Arc<ExamLoopService> {
        Arc::clone(&self.exam_loop)
    }

    fn exam_history(&self) -> Arc<ExamHistoryService> {
        Arc::clone(&self.exam_history)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Exam,
    History,
    Result(i64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    exam_handles: Option<ExamTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.exam_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Exam => rsx! { ExamView {} },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::Result(result_id) => rsx! { ResultView { result_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub exam_handles: Option<ExamTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until pending resources and spawned tasks settle.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn exam_handles(&self) -> ExamTestHandles {
        self.exam_handles.clone().expect("exam handles")
    }

    /// Dispatch an exam intent inside the dom's runtime, then flush.
    pub fn dispatch(&mut self, intent: ExamIntent) {
        let dispatch = self.exam_handles().dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn session(&self) -> ExamSession {
        let session = self.exam_handles().session();
        self.dom.in_runtime(|| session.peek().clone())
    }

    /// Whether the view holds a live exam whose countdown is still running.
    pub fn timer_running(&self) -> bool {
        let live = self.exam_handles().live();
        self.dom
            .in_runtime(|| live.peek().as_ref().is_some_and(LiveExam::timer_running))
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over in-memory storage seeded with the sample bank.
pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_settings(view, ExamSettings::reference()).await
}

pub async fn setup_view_harness_with_settings(
    view: ViewKind,
    settings: ExamSettings,
) -> ViewHarness {
    let storage = Storage::in_memory();
    QuestionBankService::new(Arc::clone(&storage.questions))
        .seed_sample()
        .await
        .expect("seed sample bank");
    let results = Arc::clone(&storage.results);
    setup_view_harness_with_results(view, settings, storage, results)
}

pub fn setup_view_harness_with_results(
    view: ViewKind,
    settings: ExamSettings,
    storage: Storage,
    results: Arc<dyn ExamResultRepository>,
) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let exam_loop = Arc::new(ExamLoopService::new(
        clock,
        settings,
        Arc::clone(&storage.questions),
        Arc::clone(&results),
    ));
    let exam_history = Arc::new(ExamHistoryService::new(clock, results));

    let exam_handles = match view {
        ViewKind::Exam => Some(ExamTestHandles::default()),
        _ => None,
    };

    let app = Arc::new(TestApp {
        settings,
        exam_loop,
        exam_history,
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            exam_handles: exam_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        exam_handles,
    }
}
