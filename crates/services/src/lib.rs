#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod error;
pub mod inflight;
pub mod session;

pub use backend::SignUpOutcome;
pub use coddy_core::Clock;

pub use api::{CoddyApi, remote};
pub use app_services::AppServices;
pub use error::{ApiError, SessionError};
pub use inflight::{InFlight, InFlightGuard, RequestKey};
pub use session::{PollingHandle, SessionContext, SessionSnapshot, SessionState, SessionStatus};
