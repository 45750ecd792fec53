use coddy_core::model::web_development_roadmap;
use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::components::{PathCard, ProgressBar, RoadmapNodeCard};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PathCardVm, RoadmapScreen, RoadmapVm, map_path_cards};

#[component]
pub fn RoadmapView() -> Element {
    let screen = use_signal(RoadmapScreen::default);

    match screen() {
        RoadmapScreen::SelectPath => rsx! {
            PathSelection { screen }
        },
        RoadmapScreen::Skills { path_id, path_name } => rsx! {
            SkillRoadmap { key: "{path_id}", screen, path_name }
        },
    }
}

#[component]
fn PathSelection(screen: Signal<RoadmapScreen>) -> Element {
    let ctx = use_context::<AppContext>();
    let api = ctx.api();

    let resource = use_resource(move || {
        let api = api.clone();
        async move {
            let paths = api.fetch_learning_paths().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_path_cards(&paths))
        }
    });

    let body = match view_state_from_resource(&resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { class: "muted", "Loading learning paths..." }
        },
        ViewState::Error(_) => rsx! {
            p { class: "banner banner-error", "Failed to load learning paths" }
        },
        ViewState::Ready(cards) => rsx! {
            SelectionGrid { cards, screen }
        },
    };

    rsx! {
        div { class: "page",
            div { class: "roadmap-intro",
                h2 { "Pilih Learning Path Anda" }
                p { class: "muted",
                    "Mulai perjalanan pembelajaran Anda dengan memilih path yang sesuai dengan tujuan karir Anda"
                }
            }
            {body}
        }
    }
}

#[component]
fn SelectionGrid(cards: Vec<PathCardVm>, screen: Signal<RoadmapScreen>) -> Element {
    rsx! {
        div { class: "path-grid",
            for card in cards {
                {
                    let path_id = card.id;
                    let path_name = card.name.clone();
                    let mut screen = screen;
                    rsx! {
                        PathCard {
                            key: "{path_id}",
                            card,
                            on_roadmap: move |()| {
                                screen.set(RoadmapScreen::Skills {
                                    path_id,
                                    path_name: path_name.clone(),
                                });
                            },
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SkillRoadmap(screen: Signal<RoadmapScreen>, path_name: String) -> Element {
    let mut roadmap = use_signal(|| RoadmapVm::from_nodes(&web_development_roadmap()));
    let mut screen = screen;

    let vm = roadmap.read().clone();
    let progress = vm.progress();
    let percent = progress.percent();
    let summary = vm.summary_label();
    let selected = vm.selected().map(str::to_owned);

    rsx! {
        div { class: "page roadmap-page",
            div { class: "roadmap-header",
                button {
                    class: "btn btn-outline",
                    r#type: "button",
                    onclick: move |_| screen.set(RoadmapScreen::SelectPath),
                    "Ganti Learning Path"
                }
                h2 { "Learning Roadmap Anda" }
                p { class: "muted", "{path_name} Path" }
                div { class: "roadmap-total",
                    span { class: "muted", "Progress Total" }
                    strong { "{percent}%" }
                }
                ProgressBar { percent }
                div { class: "roadmap-summary muted",
                    span { "{summary}" }
                    span { "Target: Full Stack Developer" }
                }
            }

            for level in vm.levels().iter().cloned() {
                section { key: "{level.name}", class: "roadmap-level",
                    h3 { class: "level-name", "{level.name}" }
                    div { class: "roadmap-grid",
                        for node in level.nodes {
                            {
                                let is_selected = selected.as_deref() == Some(node.id.as_str());
                                rsx! {
                                    RoadmapNodeCard {
                                        key: "{node.id}",
                                        selected: is_selected,
                                        node: node.clone(),
                                        on_select: move |node_id: String| {
                                            roadmap.write().select(&node_id);
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div { class: "card roadmap-legend",
                h4 { "Status Legend" }
                span { class: "node-completed", "✔ Selesai" }
                span { class: "node-in-progress", "◯ Sedang Dipelajari" }
                span { class: "node-locked", "🔒 Terkunci" }
            }
        }
    }
}
