use dioxus::prelude::*;
use services::InFlight;

use crate::context::AppContext;
use crate::views::components::{ChatBubble, TypingIndicator};
use crate::vm::{ChatVm, map_chat_bubbles};

#[component]
pub fn ChatView() -> Element {
    let ctx = use_context::<AppContext>();
    let clock = ctx.clock();
    let chat = use_signal(|| ChatVm::new(clock, InFlight::new()));
    let mut input = use_signal(String::new);

    let api = ctx.api();
    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let mut chat = chat;
        let Some(pending) = chat.write().begin_send(&input()) else {
            return;
        };
        input.set(String::new());
        let api = api.clone();
        spawn(async move {
            let result = api.ask_coddy(&pending.question).await;
            chat.write().finish_send(pending, result);
        });
    };

    let bubbles = map_chat_bubbles(chat.read().messages());
    let loading = chat.read().is_loading();
    let can_send = !loading && !input.read().trim().is_empty();

    rsx! {
        div { class: "page chat-page",
            div { class: "card chat-card",
                div { class: "chat-header",
                    span { class: "chat-avatar", "🤖" }
                    div {
                        h2 { "Coddy Chat" }
                        span { class: "muted", "Asisten Belajar Pribadi" }
                    }
                }

                div { class: "chat-messages",
                    for bubble in bubbles {
                        ChatBubble { key: "{bubble.id}", bubble }
                    }
                    if loading {
                        TypingIndicator {}
                    }
                }

                form { class: "chat-input", onsubmit: on_submit,
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Tanya sesuatu...",
                        disabled: loading,
                        value: "{input}",
                        oninput: move |evt| input.set(evt.value()),
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: !can_send,
                        "Kirim"
                    }
                }
            }
        }
    }
}
