//! User record validation
//!
//! Pure field checks for the users collection. Rejections are returned as
//! an ordered list; none of these functions perform I/O or panic on bad
//! input.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::entity::{TextInput, UserCandidate, UserRecord};

/// Maximum length for an email address
pub const MAX_EMAIL_LENGTH: usize = 50;

/// Letters (accented Latin included) and whitespace, 3 to 13 characters
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñ\s]{3,13}$").unwrap());

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static CONSECUTIVE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Validated text fields of a user record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Email,
}

impl UserField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
        }
    }

    fn pattern_message(&self) -> &'static str {
        match self {
            Self::Name => {
                "The field \"name\" must contain only letters and spaces, and be 3 to 13 characters long"
            }
            Self::Email => "The field \"email\" does not have the structure of an email",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a candidate can be rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("No data was received")]
    MissingPayload,

    #[error("The field \"{0}\" is required")]
    MissingRequiredField(UserField),

    #[error("{}", .0.pattern_message())]
    PatternMismatch(UserField),

    #[error("The field \"{0}\" must not contain consecutive spaces")]
    ConsecutiveWhitespace(UserField),

    #[error("The field \"{field}\" must not exceed {max} characters")]
    LengthExceeded { field: UserField, max: usize },

    #[error("The field \"id\" must be a positive integer")]
    InvalidId,

    #[error("User with ID {0} already exists")]
    IdConflict(u64),

    #[error("ID {0} is already used by another user")]
    IdReassignmentConflict(u64),
}

/// Interpret a raw JSON id as a positive integer
///
/// Integral floats such as `4.0` are accepted; strings, booleans,
/// fractions, zero and negatives are not.
pub fn positive_id(value: &Value) -> Option<u64> {
    let Value::Number(number) = value else {
        return None;
    };

    if let Some(id) = number.as_u64() {
        return (id > 0).then_some(id);
    }

    number
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && *f >= 1.0)
        .map(|f| f as u64)
}

/// Validate a candidate for insertion into `existing`
///
/// Errors are ordered name, email, id. An absent or key-less candidate
/// short-circuits with [`UserValidationError::MissingPayload`].
pub fn validate_for_create(
    candidate: Option<&UserCandidate>,
    existing: &[UserRecord],
) -> Vec<UserValidationError> {
    let Some(candidate) = candidate.filter(|c| !c.is_empty()) else {
        return vec![UserValidationError::MissingPayload];
    };

    let mut errors = Vec::new();

    match candidate.name() {
        TextInput::Text(name) => check_name(name, &mut errors),
        TextInput::NotText => errors.push(UserValidationError::PatternMismatch(UserField::Name)),
        TextInput::Missing => {
            errors.push(UserValidationError::MissingRequiredField(UserField::Name))
        }
    }

    match candidate.email() {
        TextInput::Text(email) => check_email(email, &mut errors),
        TextInput::NotText | TextInput::Missing => {
            errors.push(UserValidationError::PatternMismatch(UserField::Email))
        }
    }

    if let Some(raw) = candidate.raw_id() {
        match positive_id(raw) {
            Some(id) if existing.iter().any(|r| r.id() == Some(id)) => {
                errors.push(UserValidationError::IdConflict(id));
            }
            Some(_) => {}
            None => errors.push(UserValidationError::InvalidId),
        }
    }

    errors
}

/// Validate a partial update
///
/// Only fields present in the candidate are checked. The id is checked for
/// shape only; collisions are [`check_id_reassignment`]'s job.
pub fn validate_for_update(candidate: &UserCandidate) -> Vec<UserValidationError> {
    let mut errors = Vec::new();

    match candidate.name() {
        TextInput::Text(name) => check_name(name, &mut errors),
        TextInput::NotText => errors.push(UserValidationError::PatternMismatch(UserField::Name)),
        TextInput::Missing => {}
    }

    match candidate.email() {
        TextInput::Text(email) => check_email(email, &mut errors),
        TextInput::NotText => errors.push(UserValidationError::PatternMismatch(UserField::Email)),
        TextInput::Missing => {}
    }

    if candidate.raw_id().is_some_and(|raw| positive_id(raw).is_none()) {
        errors.push(UserValidationError::InvalidId);
    }

    errors
}

/// Check that moving a record from `current_id` to `new_id` keeps ids unique
pub fn check_id_reassignment(
    new_id: Option<u64>,
    current_id: u64,
    existing: &[UserRecord],
) -> Result<(), UserValidationError> {
    let new_id = match new_id {
        // Zero is read as "no change requested" and skips the collision
        // scan. Kept for compatibility with existing clients; open for review.
        None | Some(0) => return Ok(()),
        Some(id) if id == current_id => return Ok(()),
        Some(id) => id,
    };

    if existing.iter().any(|r| r.id() == Some(new_id)) {
        return Err(UserValidationError::IdReassignmentConflict(new_id));
    }

    Ok(())
}

fn check_name(name: &str, errors: &mut Vec<UserValidationError>) {
    if !NAME_PATTERN.is_match(name) {
        errors.push(UserValidationError::PatternMismatch(UserField::Name));
    }

    if CONSECUTIVE_WHITESPACE.is_match(name) {
        errors.push(UserValidationError::ConsecutiveWhitespace(UserField::Name));
    }
}

fn check_email(email: &str, errors: &mut Vec<UserValidationError>) {
    if !EMAIL_PATTERN.is_match(email) {
        errors.push(UserValidationError::PatternMismatch(UserField::Email));
    } else if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.push(UserValidationError::LengthExceeded {
            field: UserField::Email,
            max: MAX_EMAIL_LENGTH,
        });
    }
}
