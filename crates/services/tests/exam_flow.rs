use std::sync::Arc;
use std::time::Duration;

use exam_core::model::{ExamSettings, ScoreBand, SubjectFilter, SubmitReason};
use exam_core::time::fixed_now;
use services::{AppServices, Clock, ExamPhase, LiveExam, NoopObserver};

#[tokio::test]
async fn sqlite_exam_flow_persists_history() {
    let services = AppServices::new_sqlite(
        "sqlite:file:memdb_exam_flow?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
        ExamSettings::reference(),
    )
    .await
    .expect("services");

    let exam_loop = services.exam_loop();
    let filter = SubjectFilter::from_subjects(["Mathematics", "Physics"]);
    assert_eq!(exam_loop.estimate(&filter).await.unwrap(), 6);

    let mut session = exam_loop.start_exam(&filter).await.unwrap();
    let correct: Vec<usize> = session.paper().iter().map(|q| q.correct_option()).collect();
    for (position, option) in correct.into_iter().enumerate() {
        session.jump_to(position).unwrap();
        session.select_current(option).unwrap();
    }

    let submission = exam_loop.submit(&mut session).await.unwrap();
    assert_eq!(submission.report.percentage(), 100);
    assert_eq!(submission.report.band(), ScoreBand::Excellent);

    let history = services.exam_history().list_recent(10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, submission.result_id);
    assert_eq!(history[0].correct, 6);

    let stored = services
        .exam_history()
        .get_result(submission.result_id)
        .await
        .unwrap();
    assert_eq!(stored.by_subject().len(), 2);
    assert_eq!(stored.by_subject()["Physics"].total, 3);
}

#[tokio::test(start_paused = true)]
async fn live_exam_timeout_is_recorded() {
    let settings = ExamSettings::new(5, 3).unwrap();
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), settings)
        .await
        .expect("services");
    let exam_loop = services.exam_loop();

    let session = exam_loop.start_exam(&SubjectFilter::all()).await.unwrap();
    let live = LiveExam::start(session, Arc::new(NoopObserver), exam_loop.clock()).unwrap();
    live.select_answer(0, 0).unwrap();

    tokio::time::sleep(Duration::from_millis(3_500)).await;

    let finished = live.snapshot().unwrap();
    assert_eq!(finished.phase(), ExamPhase::Finished);
    assert_eq!(finished.submit_reason(), Some(SubmitReason::TimedOut));

    let id = exam_loop.record_result(&finished).await.unwrap();
    let items = services.exam_history().list_recent(5).await.unwrap();
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].reason, SubmitReason::TimedOut);
    assert_eq!(items[0].total, 5);
    assert_eq!(items[0].answered, 1);
}
