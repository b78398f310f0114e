//! Validation outcomes: malformed input and collected violations.

use crate::model::user::{EMPLOYMENT_MAX_AGE, EMPLOYMENT_MIN_AGE};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Top-level error returned by `validate`.
#[derive(Debug)]
pub enum RegistrationError {
    /// Input text is not well-formed JSON. Validation never started.
    Parse(ParseError),
    /// One or more field or cross-field constraints failed.
    Validation(ValidationFailure),
    /// A validated record could not be written back out as JSON.
    Serialize(serde_json::Error),
}

impl RegistrationError {
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the collected violations, if this is a validation failure.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Validation(failure) => Some(failure.violations()),
            Self::Parse(_) | Self::Serialize(_) => None,
        }
    }
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(failure) => write!(f, "{failure}"),
            Self::Serialize(err) => write!(f, "failed to serialize registration: {err}"),
        }
    }
}

impl Error for RegistrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Validation(failure) => Some(failure),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<ParseError> for RegistrationError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<ValidationFailure> for RegistrationError {
    fn from(value: ValidationFailure) -> Self {
        Self::Validation(value)
    }
}

/// Malformed JSON input.
#[derive(Debug)]
pub struct ParseError {
    source: serde_json::Error,
}

impl ParseError {
    /// One-based line of the first syntax error.
    pub fn line(&self) -> usize {
        self.source.line()
    }

    /// One-based column of the first syntax error.
    pub fn column(&self) -> usize {
        self.source.column()
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed JSON document: {}", self.source)
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(value: serde_json::Error) -> Self {
        Self { source: value }
    }
}

/// Complete, ordered list of violations for one document.
///
/// Never empty when returned from validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the violations attributed to one field path.
    pub fn for_field<'a>(&'a self, field_path: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations
            .iter()
            .filter(move |violation| violation.field_path == field_path)
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let count = self.violations.len();
        write!(
            f,
            "{count} validation error{} for registration",
            if count == 1 { "" } else { "s" }
        )?;
        for violation in &self.violations {
            write!(f, "\n{violation}")?;
        }
        Ok(())
    }
}

impl Error for ValidationFailure {}

/// One failed constraint, attributed to a dotted field path.
///
/// The root document has the empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field_path: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(field_path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            field_path: field_path.into(),
            kind,
        }
    }

    /// Human-readable message for this violation.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let path = if self.field_path.is_empty() {
            "<root>"
        } else {
            self.field_path.as_str()
        };
        write!(f, "{path}: {}", self.kind)
    }
}

/// Classification of a failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    NotAnObject,
    NotAString,
    NotAnInteger,
    NotABoolean,
    TooShort { min_chars: usize, actual: usize },
    NotGreaterThan { limit: i64, value: i64 },
    NotAtMost { limit: i64, value: i64 },
    /// Name contains something other than letters and whitespace.
    NotLettersOnly,
    InvalidEmail(&'static str),
    /// `is_employed` is true while `age` is outside the employment window.
    EmploymentAgeMismatch { age: i64 },
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "field required"),
            Self::NotAnObject => write!(f, "must be an object"),
            Self::NotAString => write!(f, "must be a string"),
            Self::NotAnInteger => write!(f, "must be an integer"),
            Self::NotABoolean => write!(f, "must be a boolean"),
            Self::TooShort { min_chars, actual } => write!(
                f,
                "must be at least {min_chars} characters long (got {actual})"
            ),
            Self::NotGreaterThan { limit, value } => {
                write!(f, "must be greater than {limit} (got {value})")
            }
            Self::NotAtMost { limit, value } => {
                write!(f, "must be less than or equal to {limit} (got {value})")
            }
            Self::NotLettersOnly => write!(
                f,
                "must contain only letters (including accented Latin letters) and whitespace"
            ),
            Self::InvalidEmail(reason) => write!(f, "is not a valid email address: {reason}"),
            Self::EmploymentAgeMismatch { age } => write!(
                f,
                "employed users must be between {EMPLOYMENT_MIN_AGE} and {EMPLOYMENT_MAX_AGE} years old (got {age})"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RegistrationError, ValidationFailure, Violation, ViolationKind};
    use std::error::Error;

    #[test]
    fn display_lists_every_violation_with_root_placeholder() {
        let failure = ValidationFailure::new(vec![
            Violation::new("", ViolationKind::NotAnObject),
            Violation::new(
                "address.street",
                ViolationKind::TooShort {
                    min_chars: 3,
                    actual: 2,
                },
            ),
        ]);

        assert_eq!(
            failure.to_string(),
            "2 validation errors for registration\n<root>: must be an object\naddress.street: must be at least 3 characters long (got 2)"
        );
    }

    #[test]
    fn serialize_failure_is_not_reported_as_malformed_input() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = RegistrationError::Serialize(source);

        assert!(!err.is_parse());
        assert!(!err.is_validation());
        assert!(err.violations().is_none());
        assert!(err.to_string().starts_with("failed to serialize registration"));
        assert!(!err.to_string().contains("malformed JSON document"));
        assert!(err.source().is_some());
    }

    #[test]
    fn field_lookup_and_owned_violations_keep_order() {
        let failure = ValidationFailure::new(vec![
            Violation::new("age", ViolationKind::NotAnInteger),
            Violation::new("is_employed", ViolationKind::NotABoolean),
            Violation::new("is_employed", ViolationKind::EmploymentAgeMismatch { age: 70 }),
        ]);

        let employed: Vec<&ViolationKind> =
            failure.for_field("is_employed").map(|v| &v.kind).collect();
        assert_eq!(
            employed,
            vec![
                &ViolationKind::NotABoolean,
                &ViolationKind::EmploymentAgeMismatch { age: 70 },
            ]
        );
        assert_eq!(failure.for_field("name").count(), 0);

        let owned = failure.into_violations();
        assert_eq!(owned.len(), 3);
        assert_eq!(owned[0].field_path, "age");
    }

    #[test]
    fn employment_message_cites_window() {
        let message = ViolationKind::EmploymentAgeMismatch { age: 70 }.to_string();
        assert!(message.contains("between 18 and 65"));
        assert!(message.contains("70"));
    }
}
