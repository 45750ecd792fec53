use std::sync::Arc;

use backend::{Backend, BackendConfig, BackendError, InMemoryBackend};

use crate::api::CoddyApi;
use crate::session::SessionContext;

/// Assembles the app-facing services over one backend handle.
#[derive(Clone)]
pub struct AppServices {
    api: CoddyApi,
    session: Arc<SessionContext>,
}

impl AppServices {
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        let api = CoddyApi::new(backend);
        let session = Arc::new(SessionContext::new(api.clone()));
        Self { api, session }
    }

    /// Build services talking to a hosted project.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the HTTP client cannot be built.
    pub fn supabase(config: BackendConfig) -> Result<Self, BackendError> {
        Ok(Self::new(Backend::supabase(config)?))
    }

    /// Build services over an in-memory project; used for the offline demo.
    #[must_use]
    pub fn in_memory(project: &InMemoryBackend) -> Self {
        Self::new(Backend::in_memory(project))
    }

    #[must_use]
    pub fn api(&self) -> &CoddyApi {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionContext> {
        Arc::clone(&self.session)
    }
}
