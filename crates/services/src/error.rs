//! Shared error types for the services crate.

use thiserror::Error;

use backend::BackendError;
use coddy_core::model::AuthFormError;

/// Errors emitted by `CoddyApi`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error(transparent)]
    Form(#[from] AuthFormError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The account exists but its profile row could not be written.
    /// `compensated` tells whether the account was removed again.
    #[error("sign-up failed while saving your profile: {source}")]
    ProfileCreation {
        source: BackendError,
        compensated: bool,
    },

    #[error("unexpected {operation} payload: {message}")]
    Payload {
        operation: &'static str,
        message: String,
    },
}

/// Errors emitted by `SessionContext`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A newer refresh started before this one finished; its result was dropped.
    #[error("session refresh superseded")]
    Superseded,
}
