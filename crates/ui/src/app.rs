use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::Router;
use services::SessionState;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let session = ctx.session();
    let mut session_state = use_context_provider(|| Signal::new(session.state()));

    let poll_session = ctx.session();
    let poll_interval = ctx.session_poll_interval();
    use_hook(move || poll_interval.map(|period| Rc::new(poll_session.spawn_polling(period))));

    // Mirror the session channel into a signal the router layout can read.
    use_future(move || {
        let session = session.clone();
        async move {
            let mut updates = session.subscribe();
            let refresher = session.clone();
            spawn(async move {
                if let Err(err) = refresher.refresh().await {
                    tracing::warn!(error = %err, "initial session refresh failed");
                }
            });
            loop {
                let state: SessionState = updates.borrow_and_update().clone();
                session_state.set(state);
                if updates.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Coddy" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
