use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ReportVm, result_meta_label};

#[derive(Clone, Debug, PartialEq, Eq)]
struct ResultData {
    meta: String,
    report: ReportVm,
}

#[component]
pub fn ResultView(result_id: i64) -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.exam_history();

    let resource = use_resource(move || {
        let history = history.clone();

        async move {
            let result = history.get_result(result_id).await?;
            Ok::<_, ViewError>(ResultData {
                meta: result_meta_label(&result),
                report: ReportVm::from(&result),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Exam Result" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    p { class: "result-meta", "{data.meta}" }
                    ReportPanel { report: data.report }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }

            Link { to: Route::History {}, "Back to history" }
        }
    }
}

/// Score, band and per-subject breakdown of one attempt.
#[component]
pub fn ReportPanel(report: ReportVm) -> Element {
    rsx! {
        div { class: "report",
            h3 { "{report.score_label}" }
            p { "{report.percentage_label}" }
            div { class: report.band_class, "{report.band_label}" }
            p { "{report.answered_label}" }

            h3 { "Performance by Subject" }
            div { class: "subject-scores",
                for row in report.subjects {
                    div { key: "{row.subject}", class: "subject-score",
                        div { class: "subject-score__label",
                            span { "{row.subject}" }
                            span { "{row.label}" }
                        }
                        div { class: "bar",
                            div { class: "bar__fill", width: "{row.percentage}%" }
                        }
                    }
                }
            }
        }
    }
}
