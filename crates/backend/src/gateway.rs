use std::sync::Arc;

use async_trait::async_trait;
use coddy_core::model::{Profile, Session, User, UserId};
use serde_json::Value;

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::memory::InMemoryBackend;
use crate::supabase::SupabaseClient;

/// Result of creating an account.
///
/// `user` is absent when the provider hides the identity (e.g. an already
/// registered email with confirmation on). `session` is absent when the
/// account must be confirmed by email before signing in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignUpOutcome {
    pub user: Option<User>,
    pub session: Option<Session>,
}

impl SignUpOutcome {
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

/// Auth provider contract.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Auth` with the provider message when rejected.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError>;

    /// Exchange credentials for a session and keep it as the current one.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Auth` on bad credentials.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError>;

    /// Invalidate the current session.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the provider refuses the logout.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// The user owning the current session, if any.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` for transport failures. An expired or missing
    /// session is `Ok(None)`.
    async fn get_user(&self) -> Result<Option<User>, BackendError>;

    /// Remove an identity. Only used to compensate a half-finished sign-up.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unsupported` when no privileged key is configured.
    async fn delete_user(&self, user_id: UserId) -> Result<(), BackendError>;
}

/// Access to the `profiles` table.
#[async_trait]
pub trait ProfileTable: Send + Sync {
    /// Read the profile row keyed by user id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NoRows` when the row does not exist yet.
    async fn get_profile(&self, user_id: UserId) -> Result<Profile, BackendError>;

    /// # Errors
    ///
    /// Returns `BackendError::Api` if the insert is rejected (policy, conflict).
    async fn insert_profile(&self, profile: &Profile) -> Result<(), BackendError>;
}

/// Named, parameterised remote procedures.
#[async_trait]
pub trait RpcGateway: Send + Sync {
    /// Call procedure `name`. A procedure without payload yields `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` when the procedure fails or is unknown.
    async fn call(&self, name: &str, params: Value) -> Result<Value, BackendError>;
}

/// Serverless function invocation.
#[async_trait]
pub trait FunctionGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `BackendError::Function` for non-success responses.
    async fn invoke(&self, name: &str, body: Value) -> Result<Value, BackendError>;
}

/// The configured handle to the backend, one trait object per concern.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthGateway>,
    pub profiles: Arc<dyn ProfileTable>,
    pub rpc: Arc<dyn RpcGateway>,
    pub functions: Arc<dyn FunctionGateway>,
}

impl Backend {
    /// Build a backend talking to a hosted project over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn supabase(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Arc::new(SupabaseClient::new(config)?);
        Ok(Self::from_shared(client))
    }

    /// Build a backend over an in-memory project. Clones share state.
    #[must_use]
    pub fn in_memory(project: &InMemoryBackend) -> Self {
        Self::from_shared(Arc::new(project.clone()))
    }

    fn from_shared<T>(inner: Arc<T>) -> Self
    where
        T: AuthGateway + ProfileTable + RpcGateway + FunctionGateway + 'static,
    {
        let auth: Arc<dyn AuthGateway> = inner.clone();
        let profiles: Arc<dyn ProfileTable> = inner.clone();
        let rpc: Arc<dyn RpcGateway> = inner.clone();
        let functions: Arc<dyn FunctionGateway> = inner;
        Self {
            auth,
            profiles,
            rpc,
            functions,
        }
    }
}
