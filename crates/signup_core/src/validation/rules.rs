//! Per-field structural rules.
//!
//! Each rule inspects one JSON value and either yields the typed, normalized
//! value or the single `ViolationKind` that stopped it.

use crate::validation::error::ViolationKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use validator::ValidateEmail;

const EMAIL_MAX_CHARS: usize = 254;
/// Stands in for non-ASCII local-part characters, which `validator` does not accept.
const UTF8_LOCAL_STAND_IN: char = 'x';

/// String spellings accepted as booleans, compared case-insensitively.
const TRUE_WORDS: [&str; 6] = ["true", "t", "yes", "y", "on", "1"];
const FALSE_WORDS: [&str; 6] = ["false", "f", "no", "n", "off", "0"];

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-zÀ-ÿ\s]+$").expect("valid name regex"));

pub type RuleResult<T> = Result<T, ViolationKind>;

/// Reads a string and trims surrounding whitespace.
pub fn trimmed_string(value: &Value) -> RuleResult<String> {
    match value {
        Value::String(text) => Ok(text.trim().to_string()),
        _ => Err(ViolationKind::NotAString),
    }
}

/// Reads an integer.
///
/// Besides JSON integers this takes whole floats (`30.0`), numeric strings
/// (`" 30 "`) and booleans (`true` is 1).
pub fn integer(value: &Value) -> RuleResult<i64> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            match number.as_f64() {
                Some(float)
                    if float.fract() == 0.0
                        && float >= i64::MIN as f64
                        && float < i64::MAX as f64 =>
                {
                    Ok(float as i64)
                }
                _ => Err(ViolationKind::NotAnInteger),
            }
        }
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ViolationKind::NotAnInteger),
        Value::Bool(flag) => Ok(i64::from(*flag)),
        _ => Err(ViolationKind::NotAnInteger),
    }
}

/// Reads a boolean from a JSON boolean, the integers 0/1, or a yes/no word.
pub fn boolean(value: &Value) -> RuleResult<bool> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => match number.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ViolationKind::NotABoolean),
        },
        Value::String(text) => {
            let word = text.trim().to_lowercase();
            if TRUE_WORDS.contains(&word.as_str()) {
                Ok(true)
            } else if FALSE_WORDS.contains(&word.as_str()) {
                Ok(false)
            } else {
                Err(ViolationKind::NotABoolean)
            }
        }
        _ => Err(ViolationKind::NotABoolean),
    }
}

/// Requires at least `min_chars` Unicode scalar values.
pub fn min_chars(value: &str, min_chars: usize) -> RuleResult<()> {
    let actual = value.chars().count();
    if actual < min_chars {
        return Err(ViolationKind::TooShort { min_chars, actual });
    }
    Ok(())
}

/// Requires `value > limit`.
pub fn greater_than(value: i64, limit: i64) -> RuleResult<()> {
    if value <= limit {
        return Err(ViolationKind::NotGreaterThan { limit, value });
    }
    Ok(())
}

/// Requires `value <= limit`.
pub fn at_most(value: i64, limit: i64) -> RuleResult<()> {
    if value > limit {
        return Err(ViolationKind::NotAtMost { limit, value });
    }
    Ok(())
}

/// Letters (ASCII and Latin-1 accented) and whitespace only.
pub fn letters_and_whitespace(value: &str) -> RuleResult<()> {
    if !NAME_RE.is_match(value) {
        return Err(ViolationKind::NotLettersOnly);
    }
    Ok(())
}

/// Checks address syntax and returns it with the domain lowercased.
///
/// Syntax is delegated to `validator`, which also accepts internationalized
/// domains. Local parts may carry non-ASCII letters. Dotted-atom placement and
/// a dotted, non-numeric domain are enforced here.
pub fn email_address(value: &str) -> RuleResult<String> {
    if value.chars().count() > EMAIL_MAX_CHARS {
        return Err(ViolationKind::InvalidEmail("address is too long"));
    }

    let Some((local, domain)) = value.rsplit_once('@') else {
        return Err(ViolationKind::InvalidEmail(
            "address must contain exactly one `@`",
        ));
    };
    if local.contains('@') {
        return Err(ViolationKind::InvalidEmail(
            "address must contain exactly one `@`",
        ));
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err(ViolationKind::InvalidEmail("local part has a misplaced dot"));
    }
    if local
        .chars()
        .any(|ch| !ch.is_ascii() && !ch.is_alphanumeric())
    {
        return Err(ViolationKind::InvalidEmail(
            "local part contains invalid characters",
        ));
    }
    let top_label = domain.rsplit('.').next().unwrap_or_default();
    if !domain.contains('.') || top_label.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ViolationKind::InvalidEmail(
            "domain must be a dotted internet name",
        ));
    }

    let ascii_local: String = local
        .chars()
        .map(|ch| if ch.is_ascii() { ch } else { UTF8_LOCAL_STAND_IN })
        .collect();
    if !format!("{ascii_local}@{domain}").validate_email() {
        return Err(ViolationKind::InvalidEmail("address is not valid"));
    }

    Ok(format!("{local}@{}", domain.to_lowercase()))
}
