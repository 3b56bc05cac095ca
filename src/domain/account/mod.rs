//! Account domain
//!
//! Database-backed users that register with a password and log in for a
//! session token.

mod entity;
mod repository;

pub use entity::{Account, AccountRole, NewAccount};
pub use repository::AccountRepository;

#[cfg(test)]
pub use repository::MockAccountRepository;
