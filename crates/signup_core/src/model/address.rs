//! Address record embedded in a registration.
//!
//! # Invariants
//! - `city` holds at least `CITY_MIN_CHARS` characters after trimming.
//! - `street` holds at least `STREET_MIN_CHARS` characters after trimming.
//! - `house_number` is strictly positive.

use serde::Serialize;

/// Value substituted for an absent `city` or `street`.
pub const ADDRESS_PLACEHOLDER: &str = "Not specified";
/// Value substituted for an absent `house_number` under the default policy.
///
/// It does not satisfy the positivity constraint, so a document that omits
/// the house number is always rejected.
pub const DEFAULT_HOUSE_NUMBER: i64 = 0;
pub const CITY_MIN_CHARS: usize = 2;
pub const STREET_MIN_CHARS: usize = 3;

/// Normalized address owned by exactly one `User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub city: String,
    pub street: String,
    /// Always >= 1 once validated.
    pub house_number: u64,
}
