use thiserror::Error;

/// PostgREST code for "JSON object requested, multiple (or no) rows returned".
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Errors surfaced by backend gateways.
///
/// Provider messages are kept verbatim so views can show them as-is.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("{message}")]
    Auth { status: Option<u16>, message: String },

    /// A single-row read found nothing. Callers decide whether this is benign.
    #[error("no rows returned")]
    NoRows,

    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("function {name} failed with status {status}: {message}")]
    Function {
        name: String,
        status: u16,
        message: String,
    },

    #[error("not signed in")]
    NotAuthenticated,

    #[error("{0} is not available with the current credentials")]
    Unsupported(&'static str),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl BackendError {
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        matches!(self, BackendError::NoRows)
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Auth { status, .. } => *status,
            BackendError::Api { status, .. } | BackendError::Function { status, .. } => {
                Some(*status)
            }
            BackendError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}
