use coddy_core::model::LearningPathId;
use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};
use services::SessionState;

use crate::context::AppContext;
use crate::views::{
    ChatView, DashboardView, LearningPathView, LoginView, RegisterView, RoadmapView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[route("/register", RegisterView)] Register {},
    #[layout(Protected)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/learning-path/:id", LearningPathView)] LearningPath { id: LearningPathId },
        #[route("/chat", ChatView)] Chat {},
        #[route("/roadmap", RoadmapView)] Roadmap {},
}

/// Layout for signed-in pages. Sends everyone else to the login page once
/// the session has been resolved.
#[component]
fn Protected() -> Element {
    let session_state = use_context::<Signal<SessionState>>();
    let navigator = use_navigator();

    use_effect(move || {
        let state = session_state.read();
        if !state.is_loading() && !state.is_authenticated() {
            navigator.replace(Route::Login {});
        }
    });

    let state = session_state.read().clone();
    if !state.is_authenticated() {
        return rsx! {
            div { class: "page page-centered",
                if state.is_loading() {
                    p { class: "muted", "Loading..." }
                } else {
                    p { class: "muted", "Redirecting to login..." }
                }
            }
        };
    }

    rsx! {
        div { class: "app",
            Header { greeting: state.snapshot.display_name().map(str::to_owned) }
            main { class: "content",
                Outlet::<Route> {}
            }
            BottomNav {}
        }
    }
}

#[component]
fn Header(greeting: Option<String>) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut signing_out = use_signal(|| false);

    let on_sign_out = move |_| {
        if signing_out() {
            return;
        }
        signing_out.set(true);
        let session = ctx.session();
        spawn(async move {
            if let Err(err) = session.sign_out().await {
                tracing::warn!(error = %err, "sign-out failed");
            }
            signing_out.set(false);
            navigator.replace(Route::Login {});
        });
    };

    rsx! {
        header { class: "topbar",
            div { class: "brand",
                span { class: "brand-mark", "C" }
                div { class: "brand-text",
                    span { class: "brand-name", "Coddy" }
                    span { class: "brand-tagline", "Your Coding Friends" }
                }
            }
            div { class: "topbar-actions",
                if let Some(name) = greeting {
                    span { class: "greeting", "Hai, {name}" }
                }
                button {
                    class: "btn btn-outline",
                    r#type: "button",
                    disabled: signing_out(),
                    onclick: on_sign_out,
                    "Sign out"
                }
            }
        }
    }
}

#[component]
fn BottomNav() -> Element {
    rsx! {
        nav { class: "bottom-nav",
            Link { to: Route::Dashboard {}, active_class: "active", "Learning Paths" }
            Link { to: Route::Chat {}, active_class: "active", "Chat" }
            Link { to: Route::Roadmap {}, active_class: "active", "Roadmap" }
        }
    }
}
