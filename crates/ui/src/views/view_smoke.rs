use std::sync::Arc;

use chrono::Duration;
use exam_core::model::{ExamResult, ExamSettings, Report, SubjectScore, SubmitReason};
use exam_core::time::fixed_now;
use storage::repository::{ExamResultRepository, ExamResultRow, Storage, StorageError};

use super::test_harness::{
    ViewHarness, ViewKind, setup_view_harness, setup_view_harness_with_results,
    setup_view_harness_with_settings,
};
use crate::vm::ExamIntent;

fn stored_result() -> ExamResult {
    let now = fixed_now();
    let report = Report {
        total: 3,
        answered: 2,
        correct: 2,
        by_subject: [("Physics".to_string(), SubjectScore { correct: 2, total: 3 })]
            .into_iter()
            .collect(),
    };
    ExamResult::from_report(&report, now, now + Duration::seconds(125), SubmitReason::Manual)
        .expect("valid result")
}

fn answer_all_correctly(harness: &mut ViewHarness) {
    let len = harness.session().paper().len();
    for position in 0..len {
        let correct = harness
            .session()
            .current_question()
            .map(|question| question.correct_option())
            .expect("current question");
        harness.dispatch(ExamIntent::Select(correct));
        if position + 1 < len {
            harness.dispatch(ExamIntent::Next);
        }
    }
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_smoke_renders_subject_selection() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Select Your Exam Focus"), "missing title in {html}");
    assert!(html.contains("Mathematics"), "missing subject in {html}");
    assert!(html.contains("Physics"), "missing subject in {html}");
    assert!(html.contains("Selected: All subjects"), "missing selection in {html}");
    assert!(html.contains("Estimated Questions: 18"), "missing estimate in {html}");
    assert!(html.contains("60 minutes total time limit"), "missing duration in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_toggle_updates_estimate() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(ExamIntent::ToggleSubject("Physics".to_string()));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Selected: Physics"), "missing selection in {html}");
    assert!(html.contains("Estimated Questions: 3"), "missing estimate in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_start_renders_question_timer_and_navigator() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(ExamIntent::Start);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Question 1 of 18"), "missing heading in {html}");
    assert!(html.contains("Time Remaining: 60:00"), "missing timer in {html}");
    assert!(html.contains("Answered: 0 | Remaining: 18"), "missing progress in {html}");
    assert!(html.contains("Question Progress"), "missing navigator in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_submit_scores_and_persists() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(ExamIntent::ToggleSubject("Physics".to_string()));
    harness.dispatch(ExamIntent::Start);
    harness.settle().await;

    answer_all_correctly(&mut harness);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 3 of 3"), "missing last question in {html}");
    assert!(html.contains("Submit Exam"), "missing submit in {html}");

    harness.dispatch(ExamIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Your Score: 3/3"), "missing score in {html}");
    assert!(html.contains("Percentage: 100%"), "missing percentage in {html}");
    assert!(html.contains("Excellent"), "missing band in {html}");
    assert!(html.contains("3/3 (100%)"), "missing subject row in {html}");
    assert!(html.contains("View saved result"), "missing saved link in {html}");

    let rows = harness
        .storage
        .results
        .list_results(10)
        .await
        .expect("list results");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].result.reason(), SubmitReason::Manual);
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_retake_keeps_filter() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(ExamIntent::ToggleSubject("Physics".to_string()));
    harness.dispatch(ExamIntent::Start);
    harness.settle().await;
    harness.dispatch(ExamIntent::Submit);
    harness.settle().await;
    harness.dispatch(ExamIntent::Retake);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Select Your Exam Focus"), "missing selection in {html}");
    assert!(html.contains("Selected: Physics"), "filter not kept in {html}");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn exam_view_countdown_runs_on_live_exam() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness.rebuild();
    harness.settle().await;
    assert!(!harness.timer_running());

    harness.dispatch(ExamIntent::Start);
    harness.settle().await;
    assert!(harness.timer_running());

    tokio::time::sleep(std::time::Duration::from_millis(2_500)).await;
    harness.settle().await;
    assert_eq!(harness.session().remaining_secs(), 3_598);
    assert!(harness.render().contains("Time Remaining: 59:58"));

    harness.dispatch(ExamIntent::Submit);
    harness.settle().await;
    assert!(!harness.timer_running());
    assert!(harness.render().contains("Exam Results"));
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_second_start_keeps_running_paper() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(ExamIntent::Start);
    harness.dispatch(ExamIntent::Start);
    harness.settle().await;

    let first = harness.session();
    assert!(first.is_in_progress());
    let correct = first
        .current_question()
        .map(|question| question.correct_option())
        .expect("current question");
    harness.dispatch(ExamIntent::Select(correct));
    harness.dispatch(ExamIntent::Next);
    harness.dispatch(ExamIntent::Start);
    harness.settle().await;

    let current = harness.session();
    assert_eq!(current.paper(), first.paper());
    assert_eq!(current.answer_at(0), Some(correct));
    assert_eq!(current.cursor(), 1);
    assert!(harness.render().contains("Question 2 of 18"));
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_retake_drops_pending_start() {
    let mut harness = setup_view_harness(ViewKind::Exam).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(ExamIntent::Start);
    harness.dispatch(ExamIntent::Retake);
    harness.settle().await;

    assert!(!harness.session().is_in_progress());
    assert!(!harness.timer_running());
    assert!(harness.render().contains("Select Your Exam Focus"));

    harness.dispatch(ExamIntent::Start);
    harness.settle().await;
    assert!(harness.render().contains("Question 1 of 18"));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn exam_view_timer_expiry_submits() {
    let settings = ExamSettings::new(20, 2).expect("settings");
    let mut harness = setup_view_harness_with_settings(ViewKind::Exam, settings).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(ExamIntent::Start);
    harness.settle().await;
    assert!(harness.render().contains("Time Remaining: 0:02"));

    for _ in 0..200 {
        harness.drive_async().await;
        if harness.render().contains("Exam Results") {
            break;
        }
    }
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Exam Results"), "exam did not expire in {html}");
    assert!(html.contains("Your Score: 0/18"), "missing score in {html}");

    let rows = harness
        .storage
        .results
        .list_results(10)
        .await
        .expect("list results");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].result.reason(), SubmitReason::TimedOut);
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_result_card() {
    let mut harness = setup_view_harness(ViewKind::History).await;
    harness
        .storage
        .results
        .append_result(&stored_result())
        .await
        .expect("append result");

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Score: 2/3 (67%)"), "missing score in {html}");
    assert!(html.contains("Submitted"), "missing reason in {html}");
    assert!(html.contains("View"), "missing view link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::History).await;
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No finished exams yet."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_renders_details() {
    let storage = Storage::in_memory();
    let id = storage
        .results
        .append_result(&stored_result())
        .await
        .expect("append result");
    let results = Arc::clone(&storage.results);
    let mut harness = setup_view_harness_with_results(
        ViewKind::Result(id),
        ExamSettings::reference(),
        storage,
        results,
    );
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Exam Result"), "missing title in {html}");
    assert!(html.contains("Your Score: 2/3"), "missing score in {html}");
    assert!(html.contains("Needs Improvement"), "missing band in {html}");
    assert!(html.contains("after 2m 05s"), "missing meta in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_renders_not_found() {
    let mut harness = setup_view_harness(ViewKind::Result(404)).await;
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("could not be found"), "missing not-found in {html}");
}

struct FailingResultRepo;

#[async_trait::async_trait]
impl ExamResultRepository for FailingResultRepo {
    async fn append_result(&self, _result: &ExamResult) -> Result<i64, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_result(&self, _id: i64) -> Result<ExamResult, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn list_results(&self, _limit: u32) -> Result<Vec<ExamResultRow>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with_results(
        ViewKind::History,
        ExamSettings::reference(),
        Storage::in_memory(),
        Arc::new(FailingResultRepo),
    );
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}
