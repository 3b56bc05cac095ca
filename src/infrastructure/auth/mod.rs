//! Authentication infrastructure module
//!
//! Session tokens issued at login and checked on protected routes.

mod jwt;

pub use jwt::{JwtConfig, JwtGenerator, JwtService, TokenClaims};
