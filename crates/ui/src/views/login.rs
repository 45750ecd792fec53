use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{FormStatus, submit_login};

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut status = use_signal(FormStatus::default);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if !status.write().begin() {
            return;
        }
        let session = ctx.session();
        let (email, password) = (email(), password());
        spawn(async move {
            match submit_login(&session, email, password).await {
                Ok(()) => {
                    status.write().succeed();
                    navigator.replace(Route::Dashboard {});
                }
                Err(err) => status.write().fail(&err),
            }
        });
    };

    let submitting = status.read().is_submitting();
    let error = status.read().error().map(str::to_owned);

    rsx! {
        div { class: "auth-page",
            div { class: "card auth-card",
                h2 { class: "auth-title", "Welcome Back" }
                p { class: "muted", "Sign in to continue your learning journey" }

                if let Some(message) = error {
                    div { class: "banner banner-error", "{message}" }
                }

                form { class: "auth-form", onsubmit: on_submit,
                    label { "Email"
                        input {
                            class: "input",
                            r#type: "email",
                            placeholder: "you@example.com",
                            value: "{email}",
                            oninput: move |evt| email.set(evt.value()),
                        }
                    }
                    label { "Password"
                        input {
                            class: "input",
                            r#type: "password",
                            placeholder: "••••••••",
                            value: "{password}",
                            oninput: move |evt| password.set(evt.value()),
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: submitting,
                        if submitting { "Signing in..." } else { "Sign In" }
                    }
                }

                p { class: "auth-switch",
                    span { class: "muted", "Don't have an account? " }
                    Link { to: Route::Register {}, "Sign up" }
                }
            }
        }
    }
}
