use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::components::PathCard;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PathCardVm, map_path_cards};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let api = ctx.api();

    let resource = use_resource(move || {
        let api = api.clone();
        async move {
            let paths = api.fetch_learning_paths().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_path_cards(&paths))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h1 { "Learning Paths" }
            p { class: "muted", "Select a path to start learning" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading learning paths..." }
                },
                ViewState::Ready(cards) => rsx! {
                    PathGrid { cards }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "banner banner-error", "Error: {err}" }
                },
            }
        }
    }
}

#[component]
fn PathGrid(cards: Vec<PathCardVm>) -> Element {
    if cards.is_empty() {
        return rsx! {
            p { class: "muted", "No learning paths yet." }
        };
    }
    rsx! {
        div { class: "path-grid",
            for card in cards {
                PathCard { key: "{card.id}", card }
            }
        }
    }
}
