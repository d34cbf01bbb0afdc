use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{ExamView, HistoryView, ResultView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", ExamView)] Exam {},
        #[route("/history", HistoryView)] History {},
        #[route("/results/:result_id", ResultView)] Result { result_id: i64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Practice Exam" }
            ul {
                li { Link { to: Route::Exam {}, "Exam" } }
                li { Link { to: Route::History {}, "History" } }
            }
        }
    }
}
