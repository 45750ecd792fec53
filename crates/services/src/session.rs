use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use backend::SignUpOutcome;
use coddy_core::model::{Credentials, Profile, Session, SignUpRequest, User};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::CoddyApi;
use crate::error::SessionError;

/// Who is signed in, and their profile row if it exists yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub profile: Option<Profile>,
}

impl SessionSnapshot {
    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        let user = self.user.as_ref()?;
        Some(match &self.profile {
            Some(profile) => profile.display_name(user),
            None => Profile::fallback_name(user),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub snapshot: SessionSnapshot,
}

impl SessionState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot.user.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Loading,
            snapshot: SessionSnapshot::default(),
        }
    }
}

/// Process-wide authentication state shared through the view tree.
///
/// Every state change is published on a watch channel. Refreshes are
/// numbered; a refresh that finishes after a newer one started is dropped.
pub struct SessionContext {
    api: CoddyApi,
    state: watch::Sender<SessionState>,
    generation: AtomicU64,
}

impl SessionContext {
    #[must_use]
    pub fn new(api: CoddyApi) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            api,
            state,
            generation: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn api(&self) -> &CoddyApi {
        &self.api
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().snapshot.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Re-read the current user and profile.
    ///
    /// A missing profile row is not an error. On failure the previous
    /// snapshot is kept and the error is recorded in the status.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` when the user or profile cannot be read and
    /// `SessionError::Superseded` when a newer refresh overtook this one.
    pub async fn refresh(&self) -> Result<SessionSnapshot, SessionError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| state.status = SessionStatus::Loading);

        let result = self.load_snapshot().await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(target: "services", generation, "stale session refresh dropped");
            return Err(SessionError::Superseded);
        }

        match result {
            Ok(snapshot) => {
                self.state.send_replace(SessionState {
                    status: SessionStatus::Ready,
                    snapshot: snapshot.clone(),
                });
                Ok(snapshot)
            }
            Err(err) => {
                tracing::warn!(target: "services", error = %err, "session refresh failed");
                self.state
                    .send_modify(|state| state.status = SessionStatus::Error(err.to_string()));
                Err(err.into())
            }
        }
    }

    async fn load_snapshot(&self) -> Result<SessionSnapshot, crate::ApiError> {
        let Some(user) = self.api.current_user().await? else {
            return Ok(SessionSnapshot::default());
        };
        let profile = self.api.fetch_profile(user.id).await?;
        Ok(SessionSnapshot {
            user: Some(user),
            profile,
        })
    }

    /// # Errors
    ///
    /// Returns the sign-in failure; the state is refreshed only on success.
    pub async fn sign_in(&self, credentials: Credentials) -> Result<Session, SessionError> {
        let session = self.api.sign_in(credentials).await?;
        self.refresh_after_change().await;
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns the sign-out failure; the state is refreshed either way.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        let result = self.api.sign_out().await;
        self.refresh_after_change().await;
        Ok(result?)
    }

    /// # Errors
    ///
    /// Returns the sign-up failure; the state is refreshed only on success.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, SessionError> {
        let outcome = self.api.sign_up(request).await?;
        self.refresh_after_change().await;
        Ok(outcome)
    }

    /// The auth action already succeeded; a failing follow-up refresh is
    /// recorded in the status rather than reported to the caller.
    async fn refresh_after_change(&self) {
        if let Err(err) = self.refresh().await {
            tracing::debug!(target: "services", error = %err, "refresh after auth change");
        }
    }

    /// Refresh on a fixed period until the handle is dropped.
    #[must_use]
    pub fn spawn_polling(self: &Arc<Self>, period: Duration) -> PollingHandle {
        let context: Weak<Self> = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(context) = context.upgrade() else {
                    break;
                };
                let _ = context.refresh().await;
            }
        });
        PollingHandle { task }
    }
}

/// Stops the polling task when dropped.
#[derive(Debug)]
#[must_use = "polling stops as soon as the handle is dropped"]
pub struct PollingHandle {
    task: JoinHandle<()>,
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
