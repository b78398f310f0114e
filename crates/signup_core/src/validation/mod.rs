//! Registration document validation.
//!
//! # Responsibility
//! - Parse one JSON document into a normalized `User`.
//! - Report every violated constraint rather than the first one.
//!
//! # Invariants
//! - Pass one checks each field on its own, in declaration order.
//! - Pass two checks relationships and only sees fields that passed pass one.
//! - Validation is pure: no I/O beyond `log` diagnostics that carry counts,
//!   never field values.

mod error;
mod options;
pub mod rules;

pub use error::{ParseError, RegistrationError, ValidationFailure, Violation, ViolationKind};
pub use options::{
    FieldAliases, HouseNumberPolicy, ValidatorOptions, EMAIL_FIELD, HOUSE_NUMBER_FIELD,
};

use crate::model::address::{
    Address, ADDRESS_PLACEHOLDER, CITY_MIN_CHARS, DEFAULT_HOUSE_NUMBER, STREET_MIN_CHARS,
};
use crate::model::user::{employment_age_allowed, User, AGE_MAX, NAME_MIN_CHARS};
use log::{debug, info, warn};
use rules::RuleResult;
use serde_json::{Map, Value};
use std::time::Instant;

const ADDRESS_FIELD: &str = "address";

/// Validates `document` with default options.
pub fn validate(document: &str) -> Result<User, RegistrationError> {
    validate_with(document, &ValidatorOptions::default())
}

/// Validates `document` with explicit options.
///
/// # Errors
/// - `RegistrationError::Parse` when the text is not well-formed JSON.
/// - `RegistrationError::Validation` with the full violation list otherwise.
pub fn validate_with(
    document: &str,
    options: &ValidatorOptions,
) -> Result<User, RegistrationError> {
    let started_at = Instant::now();
    debug!(
        "event=user_validate module=validation status=start bytes={}",
        document.len()
    );

    let value: Value = match serde_json::from_str(document) {
        Ok(value) => value,
        Err(err) => {
            let err = ParseError::from(err);
            warn!(
                "event=user_validate module=validation status=error error_code=malformed_json line={} column={}",
                err.line(),
                err.column()
            );
            return Err(err.into());
        }
    };

    match validate_value(&value, options) {
        Ok(user) => {
            debug!(
                "event=user_validate module=validation status=ok duration_us={}",
                started_at.elapsed().as_micros()
            );
            Ok(user)
        }
        Err(failure) => {
            info!(
                "event=user_validate module=validation status=rejected violations={} duration_us={}",
                failure.len(),
                started_at.elapsed().as_micros()
            );
            Err(failure.into())
        }
    }
}

/// Validates an already-parsed JSON value.
pub fn validate_value(
    value: &Value,
    options: &ValidatorOptions,
) -> Result<User, ValidationFailure> {
    let Some(object) = value.as_object() else {
        return Err(ValidationFailure::new(vec![Violation::new(
            "",
            ViolationKind::NotAnObject,
        )]));
    };

    let mut pass = Pass::new(options, object);

    let name = pass.required("name", |value| {
        let name = rules::trimmed_string(value)?;
        rules::min_chars(&name, NAME_MIN_CHARS)?;
        rules::letters_and_whitespace(&name)?;
        Ok(name)
    });
    let age = pass.required("age", |value| {
        let age = rules::integer(value)?;
        rules::greater_than(age, 0)?;
        rules::at_most(age, AGE_MAX)?;
        Ok(age)
    });
    let email = pass.required(EMAIL_FIELD, |value| {
        rules::email_address(&rules::trimmed_string(value)?)
    });
    let is_employed = pass.required("is_employed", rules::boolean);
    let address = pass.address();

    if let (Some(age), Some(true)) = (age, is_employed) {
        if !employment_age_allowed(age) {
            pass.violation(
                "is_employed",
                ViolationKind::EmploymentAgeMismatch { age },
            );
        }
    }

    match (name, age, email, is_employed, address) {
        (Some(name), Some(age), Some(email), Some(is_employed), Some(address))
            if pass.violations.is_empty() =>
        {
            let age = u8::try_from(age).map_err(|_| {
                ValidationFailure::new(vec![Violation::new(
                    "age",
                    ViolationKind::NotAtMost {
                        limit: AGE_MAX,
                        value: age,
                    },
                )])
            })?;
            Ok(User {
                name,
                age,
                email,
                is_employed,
                address,
            })
        }
        _ => Err(ValidationFailure::new(pass.violations)),
    }
}

/// Validates `document` and re-serializes the normalized record compactly.
///
/// Feeding the output back in yields the same output. A failure to write the
/// validated record is `RegistrationError::Serialize`.
pub fn normalize(document: &str) -> Result<String, RegistrationError> {
    let user = validate(document)?;
    user.to_json().map_err(RegistrationError::Serialize)
}

/// Violation collector for one document.
struct Pass<'a> {
    options: &'a ValidatorOptions,
    object: &'a Map<String, Value>,
    violations: Vec<Violation>,
}

impl<'a> Pass<'a> {
    fn new(options: &'a ValidatorOptions, object: &'a Map<String, Value>) -> Self {
        Self {
            options,
            object,
            violations: Vec::new(),
        }
    }

    fn violation(&mut self, field_path: impl Into<String>, kind: ViolationKind) {
        self.violations.push(Violation::new(field_path, kind));
    }

    fn check<T>(&mut self, field_path: &str, result: RuleResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(kind) => {
                self.violation(field_path, kind);
                None
            }
        }
    }

    fn required<T>(
        &mut self,
        field: &str,
        rule: impl FnOnce(&Value) -> RuleResult<T>,
    ) -> Option<T> {
        let (options, object) = (self.options, self.object);
        match options.aliases.lookup(object, field) {
            Some(value) => self.check(field, rule(value)),
            None => {
                self.violation(field, ViolationKind::Missing);
                None
            }
        }
    }

    /// Validates the embedded address, applying defaults before constraints.
    fn address(&mut self) -> Option<Address> {
        let (options, object) = (self.options, self.object);
        let aliases = &options.aliases;
        let Some(value) = aliases.lookup(object, ADDRESS_FIELD) else {
            self.violation(ADDRESS_FIELD, ViolationKind::Missing);
            return None;
        };
        let Some(address) = value.as_object() else {
            self.violation(ADDRESS_FIELD, ViolationKind::NotAnObject);
            return None;
        };

        let placeholder = Value::String(ADDRESS_PLACEHOLDER.to_string());
        let default_house_number = Value::from(DEFAULT_HOUSE_NUMBER);

        let city = aliases.lookup(address, "city").unwrap_or(&placeholder);
        let city = rules::trimmed_string(city).and_then(|city| {
            rules::min_chars(&city, CITY_MIN_CHARS)?;
            Ok(city)
        });
        let city = self.check("address.city", city);

        let street = aliases.lookup(address, "street").unwrap_or(&placeholder);
        let street = rules::trimmed_string(street).and_then(|street| {
            rules::min_chars(&street, STREET_MIN_CHARS)?;
            Ok(street)
        });
        let street = self.check("address.street", street);

        let house_number = match (
            aliases.lookup(address, HOUSE_NUMBER_FIELD),
            options.house_number_policy,
        ) {
            (Some(value), _) => Some(value),
            (None, HouseNumberPolicy::DefaultZero) => Some(&default_house_number),
            (None, HouseNumberPolicy::Required) => None,
        };
        let house_number_path = format!("{ADDRESS_FIELD}.{HOUSE_NUMBER_FIELD}");
        let house_number = match house_number {
            Some(value) => {
                let result = rules::integer(value).and_then(|number| {
                    rules::greater_than(number, 0)?;
                    u64::try_from(number).map_err(|_| ViolationKind::NotGreaterThan {
                        limit: 0,
                        value: number,
                    })
                });
                self.check(&house_number_path, result)
            }
            None => {
                self.violation(house_number_path, ViolationKind::Missing);
                None
            }
        };

        Some(Address {
            city: city?,
            street: street?,
            house_number: house_number?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{validate, validate_value, ValidatorOptions, ViolationKind};
    use serde_json::json;

    #[test]
    fn non_object_document_reports_root_violation() {
        let failure = validate_value(&json!([1, 2]), &ValidatorOptions::default()).unwrap_err();
        assert_eq!(failure.len(), 1);
        assert_eq!(failure.violations()[0].field_path, "");
        assert_eq!(failure.violations()[0].kind, ViolationKind::NotAnObject);
    }

    #[test]
    fn empty_object_reports_every_required_field() {
        let failure = validate_value(&json!({}), &ValidatorOptions::default()).unwrap_err();
        let paths: Vec<&str> = failure
            .violations()
            .iter()
            .map(|violation| violation.field_path.as_str())
            .collect();
        assert_eq!(
            paths,
            vec!["name", "age", "email", "is_employed", "address"]
        );
        assert!(failure
            .violations()
            .iter()
            .all(|violation| violation.kind == ViolationKind::Missing));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = validate("{\"name\": ").unwrap_err();
        assert!(err.is_parse());
        assert!(err.violations().is_none());
    }
}
