use dioxus::prelude::*;
use services::{ApiError, SessionError};
use thiserror::Error;

/// Failure shown by a view as a single banner string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ViewError {
    /// Provider or validation message, shown verbatim.
    #[error("{0}")]
    Remote(String),

    #[error("Something went wrong. Please try again.")]
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ApiError> for ViewError {
    fn from(err: ApiError) -> Self {
        ViewError::Remote(err.to_string())
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Api(err) => err.into(),
            other => ViewError::Remote(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coddy_core::model::AuthFormError;

    #[test]
    fn provider_messages_pass_through_verbatim() {
        let err: ViewError = ApiError::Form(AuthFormError::PasswordTooShort).into();
        assert_eq!(err.message(), "password must be at least 6 characters");
    }

    #[test]
    fn superseded_refresh_has_a_message() {
        let err: ViewError = SessionError::Superseded.into();
        assert!(!err.message().is_empty());
    }
}
