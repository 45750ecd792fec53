#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod supabase;

pub use config::{BackendConfig, ConfigError};
pub use error::BackendError;
pub use gateway::{
    AuthGateway, Backend, FunctionGateway, ProfileTable, RpcGateway, SignUpOutcome,
};
pub use memory::{CatalogCourse, CatalogPath, FailureMode, InMemoryBackend, Operation};
pub use supabase::SupabaseClient;
