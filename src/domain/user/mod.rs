//! User domain
//!
//! Records of the users collection, the candidate payloads that create or
//! update them, their validation rules and the store trait.

mod entity;
mod repository;
mod validation;

pub use entity::{TextInput, UserCandidate, UserRecord};
pub use repository::UserRecordStore;
pub use validation::{
    check_id_reassignment, positive_id, validate_for_create, validate_for_update, UserField,
    UserValidationError, MAX_EMAIL_LENGTH,
};

#[cfg(test)]
pub use repository::MockUserRecordStore;
