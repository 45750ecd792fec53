use coddy_core::model::{Credentials, SignUpRequest};
use services::{SessionContext, SessionStatus, SignUpOutcome};

use crate::views::ViewError;

/// Submission latch and error banner shared by the login and register forms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormStatus {
    submitting: bool,
    error: Option<String>,
}

impl FormStatus {
    /// Start a submission. Returns `false` if one is already running.
    pub fn begin(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.error = None;
        true
    }

    pub fn succeed(&mut self) {
        self.submitting = false;
    }

    pub fn fail(&mut self, err: &ViewError) {
        self.submitting = false;
        self.error = Some(err.message());
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Where the register form sends the user next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterSignUp {
    /// A session was issued; the user is signed in.
    Dashboard,
    /// Email confirmation pending.
    Login,
}

impl AfterSignUp {
    #[must_use]
    pub fn from_outcome(outcome: &SignUpOutcome) -> Self {
        if outcome.has_session() {
            Self::Dashboard
        } else {
            Self::Login
        }
    }
}

/// # Errors
///
/// Returns the validation or provider message as `ViewError::Remote`, and the
/// refresh failure when the session could not be loaded after signing in.
pub async fn submit_login(
    session: &SessionContext,
    email: String,
    password: String,
) -> Result<(), ViewError> {
    session.sign_in(Credentials::new(email, password)).await?;
    match session.state().status {
        SessionStatus::Error(message) => Err(ViewError::Remote(message)),
        SessionStatus::Loading | SessionStatus::Ready => Ok(()),
    }
}

/// # Errors
///
/// Returns the validation or provider message as `ViewError::Remote`.
pub async fn submit_register(
    session: &SessionContext,
    full_name: String,
    email: String,
    password: String,
) -> Result<AfterSignUp, ViewError> {
    let outcome = session
        .sign_up(SignUpRequest::new(full_name, email, password))
        .await?;
    Ok(AfterSignUp::from_outcome(&outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    use backend::{Backend, FailureMode, InMemoryBackend, Operation};
    use services::CoddyApi;

    fn session_over(project: &InMemoryBackend) -> SessionContext {
        SessionContext::new(CoddyApi::new(Backend::in_memory(project)))
    }

    #[test]
    fn second_submit_is_ignored_while_submitting() {
        let mut status = FormStatus::default();
        assert!(status.begin());
        assert!(!status.begin());
        status.fail(&ViewError::Remote("Invalid login credentials".into()));
        assert!(!status.is_submitting());
        assert_eq!(status.error(), Some("Invalid login credentials"));
        assert!(status.begin());
        assert_eq!(status.error(), None);
    }

    #[tokio::test]
    async fn login_failure_carries_provider_message() {
        let project = InMemoryBackend::new();
        let session = session_over(&project);
        let err = submit_login(&session, "a@b.c".into(), "wrong".into())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn login_reports_profile_read_failure() {
        let project = InMemoryBackend::new();
        let _ = project.register("rina@example.com", "rahasia1");
        project.fail(Operation::GetProfile, FailureMode::Always, "upstream timeout");
        let session = session_over(&project);

        let err = submit_login(&session, "rina@example.com".into(), "rahasia1".into())
            .await
            .unwrap_err();
        assert!(err.message().contains("upstream timeout"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn register_rejects_short_password_locally() {
        let project = InMemoryBackend::new();
        let session = session_over(&project);
        let err = submit_register(&session, "Rina".into(), "rina@example.com".into(), "12345".into())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "password must be at least 6 characters");
        assert!(project.calls().is_empty());
    }

    #[tokio::test]
    async fn register_routes_by_session_presence() {
        let project = InMemoryBackend::new();
        let session = session_over(&project);
        let next = submit_register(&session, "Rina".into(), "rina@example.com".into(), "rahasia1".into())
            .await
            .unwrap();
        assert_eq!(next, AfterSignUp::Dashboard);

        project.set_require_email_confirmation(true);
        let next = submit_register(&session, "Budi".into(), "budi@example.com".into(), "rahasia2".into())
            .await
            .unwrap();
        assert_eq!(next, AfterSignUp::Login);
    }
}
