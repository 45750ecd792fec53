use std::sync::RwLock;

use async_trait::async_trait;
use coddy_core::model::{Profile, Session, User, UserId};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::BackendConfig;
use crate::error::{BackendError, NO_ROWS_CODE};
use crate::gateway::{AuthGateway, FunctionGateway, ProfileTable, RpcGateway, SignUpOutcome};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// HTTP adapter for a hosted Supabase project (GoTrue auth, PostgREST,
/// edge functions).
///
/// Holds the current session; every request carries its access token, or the
/// anon key when signed out. An expired access token is renewed with the
/// session's refresh token on the first 401.
pub struct SupabaseClient {
    http: Client,
    config: BackendConfig,
    session: RwLock<Option<Session>>,
}

impl SupabaseClient {
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the underlying client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
            session: RwLock::new(None),
        })
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|guard| guard.clone())
    }

    fn store_session(&self, session: Option<Session>) {
        if let Ok(mut guard) = self.session.write() {
            *guard = session;
        }
    }

    fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|s| s.access_token.clone()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.config.url().join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self
            .access_token()
            .unwrap_or_else(|| self.config.anon_key().to_owned());
        self.http
            .request(method, url)
            .header("apikey", self.config.anon_key())
            .bearer_auth(bearer)
    }

    /// Sends the request built by `build`. A 401 while signed in trades the
    /// refresh token for a new session once and replays the request; when the
    /// refresh is refused the session is dropped and the 401 is returned.
    async fn send_authorized<F>(&self, build: F) -> Result<Response, BackendError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let sent_with = self.access_token();
        let response = build().send().await?;
        if response.status() != StatusCode::UNAUTHORIZED || sent_with.is_none() {
            return Ok(response);
        }
        // Another request may already have rotated the token.
        if self.access_token() == sent_with && !self.refresh_session().await {
            return Ok(response);
        }
        Ok(build().send().await?)
    }

    async fn refresh_session(&self) -> bool {
        let Some(refresh_token) = self.session().and_then(|s| s.refresh_token) else {
            tracing::debug!(target: "backend", "access token expired without a refresh token");
            self.store_session(None);
            return false;
        };
        match self.exchange_refresh_token(&refresh_token).await {
            Ok(session) => {
                tracing::debug!(target: "backend", user_id = %session.user.id, "session refreshed");
                self.store_session(Some(session));
                true
            }
            Err(err) => {
                tracing::warn!(target: "backend", error = %err, "session refresh refused");
                self.store_session(None);
                false
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "refresh_token");
        let response = self
            .http
            .post(url)
            .header("apikey", self.config.anon_key())
            .bearer_auth(self.config.anon_key())
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        Ok(serde_json::from_value(self.auth_json(response).await?)?)
    }

    async fn auth_json(&self, response: Response) -> Result<Value, BackendError> {
        let status = response.status();
        if status.is_success() {
            return read_json(response).await;
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Auth {
            status: Some(status.as_u16()),
            message: ErrorBody::parse(&body).message(status),
        })
    }

    async fn rest_json(&self, response: Response) -> Result<Value, BackendError> {
        let status = response.status();
        if status.is_success() {
            return read_json(response).await;
        }
        let body = response.text().await.unwrap_or_default();
        Err(ErrorBody::parse(&body).into_api_error(status))
    }
}

async fn read_json(response: Response) -> Result<Value, BackendError> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Union of the error shapes returned by GoTrue, PostgREST and functions.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(skip)]
    raw: String,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        let mut parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        parsed.raw = body.trim().to_owned();
        parsed
    }

    fn code(&self) -> Option<String> {
        match &self.code {
            Some(Value::String(code)) => Some(code.clone()),
            _ => self.error_code.clone(),
        }
    }

    fn message(&self, status: StatusCode) -> String {
        let error_text = match &self.error {
            Some(Value::String(text)) => Some(text.clone()),
            _ => None,
        };
        [
            self.error_description.clone(),
            self.msg.clone(),
            self.message.clone(),
            error_text,
        ]
        .into_iter()
        .flatten()
        .find(|m| !m.trim().is_empty())
        .or_else(|| (!self.raw.is_empty() && !self.raw.starts_with('{')).then(|| self.raw.clone()))
        .unwrap_or_else(|| format!("request failed with status {status}"))
    }

    fn into_api_error(self, status: StatusCode) -> BackendError {
        let code = self.code();
        if code.as_deref() == Some(NO_ROWS_CODE) {
            return BackendError::NoRows;
        }
        BackendError::Api {
            status: status.as_u16(),
            message: self.message(status),
            code,
        }
    }
}

/// `/signup` answers with a session when auto-confirm is on, otherwise with
/// the bare user object.
fn decode_sign_up(body: Value) -> Result<SignUpOutcome, BackendError> {
    if body.get("access_token").is_some() {
        let session: Session = serde_json::from_value(body)?;
        return Ok(SignUpOutcome {
            user: Some(session.user.clone()),
            session: Some(session),
        });
    }
    if let Some(user) = body.get("user").filter(|u| !u.is_null()) {
        return Ok(SignUpOutcome {
            user: Some(serde_json::from_value(user.clone())?),
            session: None,
        });
    }
    if body.get("id").is_some() {
        return Ok(SignUpOutcome {
            user: Some(serde_json::from_value(body)?),
            session: None,
        });
    }
    Ok(SignUpOutcome::default())
}

#[async_trait]
impl AuthGateway for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError> {
        tracing::debug!(target: "backend", "auth sign_up");
        let url = self.endpoint("auth/v1/signup")?;
        let response = self
            .request(Method::POST, url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let outcome = decode_sign_up(self.auth_json(response).await?)?;
        if let Some(session) = &outcome.session {
            self.store_session(Some(session.clone()));
        }
        Ok(outcome)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        tracing::debug!(target: "backend", "auth sign_in_with_password");
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response = self
            .request(Method::POST, url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let session: Session = serde_json::from_value(self.auth_json(response).await?)?;
        self.store_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        tracing::debug!(target: "backend", "auth sign_out");
        if self.access_token().is_none() {
            return Ok(());
        }
        let url = self.endpoint("auth/v1/logout")?;
        let response = self.request(Method::POST, url).send().await?;
        let status = response.status();
        // An already-expired token still ends the local session.
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
            self.store_session(None);
            return Ok(());
        }
        let result = self.auth_json(response).await.map(|_| ());
        if result.is_ok() {
            self.store_session(None);
        }
        result
    }

    async fn get_user(&self) -> Result<Option<User>, BackendError> {
        if self.access_token().is_none() {
            return Ok(None);
        }
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .send_authorized(|| self.request(Method::GET, url.clone()))
            .await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!(target: "backend", %status, "session rejected, treating as signed out");
            self.store_session(None);
            return Ok(None);
        }
        let body = self.auth_json(response).await?;
        if body.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(body)?))
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), BackendError> {
        let service_key = self
            .config
            .service_role_key()
            .ok_or(BackendError::Unsupported("account deletion"))?;
        tracing::debug!(target: "backend", %user_id, "auth admin delete_user");
        let url = self.endpoint(&format!("auth/v1/admin/users/{user_id}"))?;
        let response = self
            .http
            .delete(url)
            .header("apikey", service_key)
            .bearer_auth(service_key)
            .send()
            .await?;
        self.auth_json(response).await?;
        if self.session().is_some_and(|s| s.user.id == user_id) {
            self.store_session(None);
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileTable for SupabaseClient {
    async fn get_profile(&self, user_id: UserId) -> Result<Profile, BackendError> {
        tracing::debug!(target: "backend", %user_id, "select profiles");
        let mut url = self.endpoint("rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("select", "id,full_name");
        let response = self
            .send_authorized(|| {
                self.request(Method::GET, url.clone())
                    .header(ACCEPT, SINGLE_OBJECT)
            })
            .await?;
        let body = self.rest_json(response).await?;
        if body.is_null() {
            return Err(BackendError::NoRows);
        }
        Ok(serde_json::from_value(body)?)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), BackendError> {
        tracing::debug!(target: "backend", user_id = %profile.id, "insert profiles");
        let url = self.endpoint("rest/v1/profiles")?;
        let response = self
            .send_authorized(|| {
                self.request(Method::POST, url.clone())
                    .header("Prefer", "return=minimal")
                    .json(profile)
            })
            .await?;
        self.rest_json(response).await.map(|_| ())
    }
}

#[async_trait]
impl RpcGateway for SupabaseClient {
    async fn call(&self, name: &str, params: Value) -> Result<Value, BackendError> {
        tracing::debug!(target: "backend", procedure = name, "rpc");
        let url = self.endpoint(&format!("rest/v1/rpc/{name}"))?;
        let params = if params.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            params
        };
        let response = self
            .send_authorized(|| self.request(Method::POST, url.clone()).json(&params))
            .await?;
        self.rest_json(response).await
    }
}

#[async_trait]
impl FunctionGateway for SupabaseClient {
    async fn invoke(&self, name: &str, body: Value) -> Result<Value, BackendError> {
        tracing::debug!(target: "backend", function = name, "invoke");
        let url = self.endpoint(&format!("functions/v1/{name}"))?;
        let response = self
            .send_authorized(|| self.request(Method::POST, url.clone()).json(&body))
            .await?;
        let status = response.status();
        if status.is_success() {
            return read_json(response).await;
        }
        let text = response.text().await.unwrap_or_default();
        Err(BackendError::Function {
            name: name.to_owned(),
            status: status.as_u16(),
            message: ErrorBody::parse(&text).message(status),
        })
    }
}
