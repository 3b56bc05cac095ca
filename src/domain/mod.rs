//! Domain layer - Core business logic and entities

pub mod account;
pub mod error;
pub mod user;

pub use account::{Account, AccountRepository, AccountRole, NewAccount};
pub use error::DomainError;
pub use user::{
    check_id_reassignment, validate_for_create, validate_for_update, UserCandidate, UserRecord,
    UserRecordStore, UserValidationError,
};

#[cfg(test)]
pub use account::MockAccountRepository;
