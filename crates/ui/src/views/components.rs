use coddy_core::model::RoadmapNode;
use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;
use crate::vm::{ChatBubbleVm, PathCardVm, node_style};

#[component]
pub fn ProgressBar(percent: u8) -> Element {
    rsx! {
        div { class: "progress-track",
            div { class: "progress-fill", style: "width: {percent}%" }
        }
    }
}

/// Learning path summary card. `on_roadmap` adds a second action that opens
/// the skill roadmap instead of the curriculum.
#[component]
pub fn PathCard(card: PathCardVm, on_roadmap: Option<EventHandler<()>>) -> Element {
    let progress_class = if card.started {
        "progress-value started"
    } else {
        "progress-value"
    };

    rsx! {
        div { class: "card path-card accent-{card.meta.accent}",
            div { class: "path-icon icon-{card.meta.icon}" }
            h3 { class: "path-name", "{card.name}" }
            p { class: "path-description muted", "{card.meta.description}" }

            div { class: "path-progress",
                div { class: "progress-header",
                    span { class: "muted", "Progress" }
                    span { class: "{progress_class}", "{card.progress}%" }
                }
                ProgressBar { percent: card.progress }
            }

            div { class: "path-meta muted",
                span { "{card.courses_label}" }
                span { "{card.hours_label}" }
            }

            div { class: "path-actions",
                Link {
                    class: "path-link",
                    to: Route::LearningPath { id: card.id },
                    "Lihat Kurikulum →"
                }
                if let Some(handler) = on_roadmap {
                    button {
                        class: "btn btn-outline",
                        r#type: "button",
                        onclick: move |_| handler.call(()),
                        "Roadmap"
                    }
                }
            }
        }
    }
}

#[component]
pub fn ChatBubble(bubble: ChatBubbleVm) -> Element {
    let side = if bubble.from_user { "from-user" } else { "from-coddy" };

    rsx! {
        div { class: "chat-row {side}",
            div { class: "chat-avatar", if bubble.from_user { "🙂" } else { "🤖" } }
            div { class: "chat-body",
                div { class: "chat-author muted", "{bubble.author}" }
                if bubble.from_user {
                    div { class: "chat-bubble", "{bubble.body}" }
                } else {
                    div {
                        class: "chat-bubble markdown-content",
                        dangerous_inner_html: "{bubble.body}",
                    }
                }
                div { class: "chat-time muted", "{bubble.time}" }
            }
        }
    }
}

#[component]
pub fn TypingIndicator() -> Element {
    rsx! {
        div { class: "chat-row from-coddy",
            div { class: "chat-avatar", "🤖" }
            div { class: "chat-bubble typing", "Mengetik..." }
        }
    }
}

#[component]
pub fn RoadmapNodeCard(node: RoadmapNode, selected: bool, on_select: EventHandler<String>) -> Element {
    let style = node_style(node.status);
    let interactive = node.status.is_interactive();
    let selected_class = if selected { "selected" } else { "" };
    let node_id = node.id.clone();

    rsx! {
        button {
            class: "roadmap-node {style.accent} {selected_class}",
            r#type: "button",
            disabled: !interactive,
            onclick: move |_| {
                if interactive {
                    on_select.call(node_id.clone());
                }
            },
            span { class: "node-icon", "{style.icon}" }
            div { class: "node-text",
                h4 { "{node.title}" }
                p { class: "muted", "{node.description}" }
                span { class: "node-badge", "{style.badge}" }
            }
        }
    }
}
