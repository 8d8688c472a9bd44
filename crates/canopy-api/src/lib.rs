// canopy-api: Async Rust client for the forest and wildlife tracking REST service

pub mod auth;
pub mod client;
pub mod collection;
pub mod error;
pub mod transport;

pub use auth::{AuthResponse, AuthUser};
pub use client::ApiClient;
pub use collection::{Collection, Filter};
pub use error::Error;
pub use transport::TransportConfig;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
