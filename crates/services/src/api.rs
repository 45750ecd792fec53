use backend::{Backend, BackendError, SignUpOutcome};
use coddy_core::model::{
    ChatAnswer, ChatQuestion, Course, CourseId, Credentials, LearningPath, LearningPathId,
    Profile, Session, SignUpRequest, User, UserId,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::ApiError;

/// Names of the remote procedures and functions the client depends on.
pub mod remote {
    pub const LEARNING_PATHS: &str = "get_learning_paths_with_progress";
    pub const COURSES_BY_PATH: &str = "get_courses_by_learning_path";
    pub const SET_COURSE_PROGRESS: &str = "set_course_progress";
    pub const CHAT_FUNCTION: &str = "coddy-chat";
}

/// Typed façade over the backend. Views never touch gateways directly.
#[derive(Clone)]
pub struct CoddyApi {
    backend: Backend,
}

impl CoddyApi {
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Create an account and its profile row.
    ///
    /// When the profile insert fails the freshly created identity is deleted
    /// again so no account is left without a profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Form` for invalid fields, `ApiError::Backend` when the
    /// provider rejects the account, and `ApiError::ProfileCreation` when the
    /// second step fails.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, ApiError> {
        let request = request.validate()?;
        let credentials = &request.credentials;
        let outcome = self
            .backend
            .auth
            .sign_up(&credentials.email, &credentials.password)
            .await?;

        let Some(user) = outcome.user.as_ref() else {
            return Ok(outcome);
        };

        let profile = Profile::new(user.id, request.full_name.clone());
        if let Err(source) = self.backend.profiles.insert_profile(&profile).await {
            let compensated = self.compensate_sign_up(user.id).await;
            return Err(ApiError::ProfileCreation {
                source,
                compensated,
            });
        }

        tracing::info!(target: "services", user_id = %user.id, session = outcome.has_session(), "account created");
        Ok(outcome)
    }

    async fn compensate_sign_up(&self, user_id: UserId) -> bool {
        tracing::warn!(target: "services", %user_id, "profile insert failed, removing account");
        match self.backend.auth.delete_user(user_id).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(target: "services", %user_id, error = %err, "account left without profile");
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ApiError::Backend` with the provider message on bad credentials.
    pub async fn sign_in(&self, credentials: Credentials) -> Result<Session, ApiError> {
        let credentials = credentials.validate()?;
        let session = self
            .backend
            .auth
            .sign_in_with_password(&credentials.email, &credentials.password)
            .await?;
        tracing::info!(target: "services", user_id = %session.user.id, "signed in");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Backend` if the provider refuses the logout.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.backend.auth.sign_out().await?;
        tracing::info!(target: "services", "signed out");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ApiError::Backend` for transport failures.
    pub async fn current_user(&self) -> Result<Option<User>, ApiError> {
        Ok(self.backend.auth.get_user().await?)
    }

    /// Read a profile row. A missing row is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` for any failure other than "no rows".
    pub async fn fetch_profile(&self, user_id: UserId) -> Result<Option<Profile>, ApiError> {
        match self.backend.profiles.get_profile(user_id).await {
            Ok(profile) => Ok(Some(profile)),
            Err(BackendError::NoRows) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `ApiError::Backend` when the procedure fails and
    /// `ApiError::Payload` when rows cannot be decoded.
    pub async fn fetch_learning_paths(&self) -> Result<Vec<LearningPath>, ApiError> {
        tracing::debug!(target: "services", "fetch learning paths");
        let value = self
            .backend
            .rpc
            .call(remote::LEARNING_PATHS, Value::Null)
            .await?;
        decode_rows(remote::LEARNING_PATHS, value)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Backend` when the procedure fails and
    /// `ApiError::Payload` when rows cannot be decoded.
    pub async fn fetch_courses_by_learning_path(
        &self,
        learning_path_id: LearningPathId,
    ) -> Result<Vec<Course>, ApiError> {
        tracing::debug!(target: "services", %learning_path_id, "fetch courses");
        let value = self
            .backend
            .rpc
            .call(
                remote::COURSES_BY_PATH,
                json!({ "p_learning_path_id": learning_path_id }),
            )
            .await?;
        decode_rows(remote::COURSES_BY_PATH, value)
    }

    /// Set a course's completion flag. Returns no payload; callers update
    /// their local list themselves.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` when the procedure fails.
    pub async fn update_course_progress(
        &self,
        course_id: CourseId,
        is_graduated: bool,
    ) -> Result<(), ApiError> {
        tracing::debug!(target: "services", %course_id, is_graduated, "set course progress");
        self.backend
            .rpc
            .call(
                remote::SET_COURSE_PROGRESS,
                json!({ "p_course_id": course_id, "p_is_graduated": is_graduated }),
            )
            .await?;
        Ok(())
    }

    /// Ask the tutoring assistant a free-text question.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` for transport or function failures and
    /// `ApiError::Payload` when the answer is missing. Failures are logged.
    pub async fn ask_coddy(&self, question: &str) -> Result<ChatAnswer, ApiError> {
        let body = serde_json::to_value(ChatQuestion {
            question: question.to_owned(),
        })
        .map_err(|err| ApiError::Payload {
            operation: remote::CHAT_FUNCTION,
            message: err.to_string(),
        })?;
        let result = match self
            .backend
            .functions
            .invoke(remote::CHAT_FUNCTION, body)
            .await
        {
            Ok(value) => serde_json::from_value::<ChatAnswer>(value).map_err(|err| {
                ApiError::Payload {
                    operation: remote::CHAT_FUNCTION,
                    message: err.to_string(),
                }
            }),
            Err(err) => Err(err.into()),
        };
        if let Err(err) = &result {
            tracing::error!(target: "services", error = %err, "coddy-chat error");
        }
        result
    }
}

/// Decode a procedure's row set. A JSON `null` is an empty set.
fn decode_rows<T: DeserializeOwned>(
    operation: &'static str,
    value: Value,
) -> Result<Vec<T>, ApiError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|err| ApiError::Payload {
        operation,
        message: err.to_string(),
    })
}
