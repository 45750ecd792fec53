use std::sync::Arc;

use backend::InMemoryBackend;
use coddy_core::Clock;
use coddy_core::model::{Credentials, LearningPathId};
use coddy_core::time::fixed_clock;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AppServices, CoddyApi, SessionContext};

use crate::context::{UiApp, build_app_context};
use crate::views::{ChatView, DashboardView, LearningPathView, LoginView, RoadmapView};

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn api(&self) -> CoddyApi {
        self.services.api().clone()
    }

    fn session(&self) -> Arc<SessionContext> {
        self.services.session()
    }

    fn clock(&self) -> Clock {
        fixed_clock()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Dashboard,
    LearningPath(LearningPathId),
    Chat,
    Roadmap,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let ctx = use_context_provider(|| build_app_context(&app));
    use_context_provider(|| Signal::new(ctx.session().state()));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::LearningPath(id) => rsx! { LearningPathView { id } },
        ViewKind::Chat => rsx! { ChatView {} },
        ViewKind::Roadmap => rsx! { RoadmapView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub project: InMemoryBackend,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Let spawned resources finish, then re-render.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over a seeded in-memory project with a signed-in learner.
pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let project = InMemoryBackend::seeded();
    let _ = project.register("rina@example.com", "rahasia1");
    let services = AppServices::in_memory(&project);
    services
        .session()
        .sign_in(Credentials::new("rina@example.com", "rahasia1"))
        .await
        .expect("sign in");

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { services }),
            view,
        },
    );

    ViewHarness { dom, project }
}
