//! Registered user record.
//!
//! # Responsibility
//! - Hold the normalized result of one successful validation pass.
//! - Re-serialize the record under canonical field names.
//!
//! # Invariants
//! - `name` is at least `NAME_MIN_CHARS` letters/whitespace, trimmed.
//! - `age` is within `1..=AGE_MAX`.
//! - `is_employed` implies `age` within `EMPLOYMENT_MIN_AGE..=EMPLOYMENT_MAX_AGE`.
//! - `email` is syntactically valid with a lowercase domain.

use crate::model::address::Address;
use crate::validation::{validate, RegistrationError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::str::FromStr;

pub const NAME_MIN_CHARS: usize = 2;
pub const AGE_MAX: i64 = 120;
pub const EMPLOYMENT_MIN_AGE: i64 = 18;
pub const EMPLOYMENT_MAX_AGE: i64 = 65;

const PRETTY_INDENT: &[u8] = b"    ";

/// Normalized registration record.
///
/// Field order here is the field order of the serialized output.
///
/// Documents become users through `FromStr` or `validate`, never through serde:
///
/// ```compile_fail
/// let user: signup_core::User = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub name: String,
    pub age: u8,
    /// Canonical name regardless of which input alias carried the value.
    pub email: String,
    pub is_employed: bool,
    pub address: Address,
}

impl User {
    /// Serializes the record as compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serializes the record as JSON indented by four spaces.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever writes valid UTF-8.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Returns whether the employment/age rule holds for this record.
    pub fn employment_age_consistent(&self) -> bool {
        !self.is_employed || employment_age_allowed(i64::from(self.age))
    }
}

impl FromStr for User {
    type Err = RegistrationError;

    /// Parses and validates a registration document with default options.
    fn from_str(document: &str) -> Result<Self, Self::Err> {
        validate(document)
    }
}

/// Returns whether `age` is inside the inclusive employment window.
pub fn employment_age_allowed(age: i64) -> bool {
    (EMPLOYMENT_MIN_AGE..=EMPLOYMENT_MAX_AGE).contains(&age)
}

#[cfg(test)]
mod tests {
    use super::{employment_age_allowed, User};
    use crate::model::address::Address;

    fn sample_user() -> User {
        User {
            name: "Elena".to_string(),
            age: 65,
            email: "elena@example.com".to_string(),
            is_employed: true,
            address: Address {
                city: "Prague".to_string(),
                street: "Wenceslas Square".to_string(),
                house_number: 77,
            },
        }
    }

    #[test]
    fn employment_window_is_inclusive() {
        assert!(!employment_age_allowed(17));
        assert!(employment_age_allowed(18));
        assert!(employment_age_allowed(65));
        assert!(!employment_age_allowed(66));
    }

    #[test]
    fn to_json_keeps_declaration_order() {
        let json = sample_user().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"name":"Elena","age":65,"email":"elena@example.com","is_employed":true,"address":{"city":"Prague","street":"Wenceslas Square","house_number":77}}"#
        );
    }

    #[test]
    fn to_json_pretty_uses_four_space_indent() {
        let json = sample_user().to_json_pretty().unwrap();
        assert!(json.contains("\n    \"name\": \"Elena\""));
        assert!(json.contains("\n        \"house_number\": 77"));
    }

    #[test]
    fn from_str_runs_validation() {
        let err = "{\"name\": \"x\"}".parse::<User>().unwrap_err();
        assert!(err.is_validation());
    }
}
