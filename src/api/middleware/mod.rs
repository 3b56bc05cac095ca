//! API middleware components

pub mod auth;
pub mod logging;

pub use auth::RequireToken;
pub use logging::logging_middleware;
