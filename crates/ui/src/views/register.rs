use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{AfterSignUp, FormStatus, submit_register};

#[component]
pub fn RegisterView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut full_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut status = use_signal(FormStatus::default);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if !status.write().begin() {
            return;
        }
        let session = ctx.session();
        let (full_name, email, password) = (full_name(), email(), password());
        spawn(async move {
            match submit_register(&session, full_name, email, password).await {
                Ok(next) => {
                    status.write().succeed();
                    match next {
                        AfterSignUp::Dashboard => navigator.replace(Route::Dashboard {}),
                        AfterSignUp::Login => navigator.replace(Route::Login {}),
                    };
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
                h2 { class: "auth-title", "Create Account" }
                p { class: "muted", "Start your learning path today" }

                if let Some(message) = error {
                    div { class: "banner banner-error", "{message}" }
                }

                form { class: "auth-form", onsubmit: on_submit,
                    label { "Full Name"
                        input {
                            class: "input",
                            r#type: "text",
                            placeholder: "John Doe",
                            value: "{full_name}",
                            oninput: move |evt| full_name.set(evt.value()),
                        }
                    }
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
                            minlength: "6",
                            value: "{password}",
                            oninput: move |evt| password.set(evt.value()),
                        }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: submitting,
                        if submitting { "Creating account..." } else { "Sign Up" }
                    }
                }

                p { class: "auth-switch",
                    span { class: "muted", "Already have an account? " }
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
