use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ExamResultCardVm, map_result_cards};

const RECENT_LIMIT: u32 = 20;

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    cards: Vec<ExamResultCardVm>,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.exam_history();

    let resource = use_resource(move || {
        let history = history.clone();
        async move {
            let items = history.list_recent(RECENT_LIMIT).await?;
            let cards = map_result_cards(&items);
            Ok::<_, ViewError>(HistoryData { cards })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        p { "No finished exams yet." }
                    } else {
                        ul {
                            for card in data.cards {
                                ResultCard { key: "{card.id}", card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn ResultCard(card: ExamResultCardVm) -> Element {
    rsx! {
        li {
            Link { class: "summary-link", to: Route::Result { result_id: card.id },
                span { class: "summary-date", "{card.completed_at_str}" }
                span { class: "summary-cta", "View" }
            }
            p {
                "{card.reason_str} | Score: {card.score_str} | {card.band_label} | Time: {card.elapsed_str}"
            }
        }
    }
}
