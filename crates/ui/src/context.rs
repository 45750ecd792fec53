use std::sync::Arc;
use std::time::Duration;

use coddy_core::Clock;
use services::{CoddyApi, SessionContext};

/// What the composition root has to provide to the view tree.
pub trait UiApp: Send + Sync {
    fn api(&self) -> CoddyApi;
    fn session(&self) -> Arc<SessionContext>;

    fn clock(&self) -> Clock {
        Clock::system()
    }

    /// Re-check the session on this period while the window is open.
    fn session_poll_interval(&self) -> Option<Duration> {
        None
    }
}

#[derive(Clone)]
pub struct AppContext {
    api: CoddyApi,
    session: Arc<SessionContext>,
    clock: Clock,
    session_poll_interval: Option<Duration>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            api: app.api(),
            session: app.session(),
            clock: app.clock(),
            session_poll_interval: app.session_poll_interval(),
        }
    }

    #[must_use]
    pub fn api(&self) -> CoddyApi {
        self.api.clone()
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionContext> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn session_poll_interval(&self) -> Option<Duration> {
        self.session_poll_interval
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
