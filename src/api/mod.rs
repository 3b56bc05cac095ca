//! API layer - HTTP endpoints and middleware

pub mod accounts;
pub mod demo;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod users;

pub use middleware::RequireToken;
pub use router::create_router;
pub use state::AppState;
