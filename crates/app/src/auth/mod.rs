//! API token authentication.
//!
//! Requests authenticate with a bearer token issued by the ops CLI. Tokens
//! are stored hashed; a successful lookup yields the owning tenant, which
//! becomes the row-level security context for the rest of the request.

mod errors;
mod models;
mod repository;
mod service;
mod token;

pub use errors::AuthServiceError;
pub use models::{ApiTokenMetadata, IssuedApiToken};
pub use service::{AuthService, MockAuthService, PgAuthService};
pub use token::{API_TOKEN_PREFIX, hash_api_token};
