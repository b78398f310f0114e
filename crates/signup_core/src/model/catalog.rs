//! Category/product catalog records.
//!
//! # Responsibility
//! - Define catalog rows as read back from storage.
//! - Define write requests and their declaration-level limits.
//!
//! # Invariants
//! - `Price` is fixed-point with two decimals and at most eight digits.
//! - A product belongs to zero or one category.

use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type CategoryId = i64;
pub type ProductId = i64;

pub const CATEGORY_NAME_MAX_CHARS: usize = 100;
pub const CATEGORY_DESCRIPTION_MAX_CHARS: usize = 255;
pub const PRODUCT_NAME_MAX_CHARS: usize = 100;

/// Largest representable price in cents (`999999.99`).
pub const PRICE_MAX_CENTS: i64 = 99_999_999;

/// Fixed-point price stored as integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    /// Builds a price from cents, rejecting negative or oversized values.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative);
        }
        if cents > PRICE_MAX_CENTS {
            return Err(PriceError::TooLarge(cents));
        }
        Ok(Self(cents))
    }

    pub fn cents(self) -> i64 {
        self.0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    /// Parses decimal text such as `299.99`, `40.5` or `20`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.starts_with('-') {
            return Err(PriceError::Negative);
        }

        let (units, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(PriceError::Malformed(trimmed.to_string()));
        }
        if fraction.len() > 2 {
            return Err(PriceError::TooPrecise(trimmed.to_string()));
        }

        let units: i64 = units
            .parse()
            .map_err(|_| PriceError::Malformed(trimmed.to_string()))?;
        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
            _ => fraction
                .parse::<i64>()
                .map_err(|_| PriceError::Malformed(trimmed.to_string()))?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|value| value.checked_add(fraction_cents))
            .ok_or(PriceError::TooLarge(i64::MAX))?;
        Self::from_cents(cents)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Price construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    Negative,
    TooLarge(i64),
    TooPrecise(String),
    Malformed(String),
}

impl Display for PriceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "price must not be negative"),
            Self::TooLarge(cents) => write!(
                f,
                "price {cents} cents exceeds the maximum of {PRICE_MAX_CENTS} cents"
            ),
            Self::TooPrecise(value) => {
                write!(f, "price `{value}` has more than two decimal places")
            }
            Self::Malformed(value) => write!(f, "price `{value}` is not a decimal number"),
        }
    }
}

impl Error for PriceError {}

/// Persisted category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

/// Persisted product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub in_stock: bool,
    /// `None` for products not attached to any category.
    pub category_id: Option<CategoryId>,
}

/// Write request for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub in_stock: bool,
}

impl NewProduct {
    /// Creates an in-stock product request.
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
            in_stock: true,
        }
    }
}

/// Write request for a category together with its initial products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub products: Vec<NewProduct>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            products: Vec::new(),
        }
    }

    /// Appends one product to the request.
    pub fn with_product(mut self, product: NewProduct) -> Self {
        self.products.push(product);
        self
    }

    /// Checks column length limits before any write happens.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        check_text("categories.name", &self.name, CATEGORY_NAME_MAX_CHARS)?;
        check_text(
            "categories.description",
            &self.description,
            CATEGORY_DESCRIPTION_MAX_CHARS,
        )?;
        for product in &self.products {
            check_text("products.name", &product.name, PRODUCT_NAME_MAX_CHARS)?;
        }
        Ok(())
    }
}

fn check_text(
    column: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), CatalogValidationError> {
    if value.trim().is_empty() {
        return Err(CatalogValidationError::Empty(column));
    }
    let actual = value.chars().count();
    if actual > max_chars {
        return Err(CatalogValidationError::TooLong {
            column,
            max_chars,
            actual,
        });
    }
    Ok(())
}

/// Declaration-level catalog write errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValidationError {
    Empty(&'static str),
    TooLong {
        column: &'static str,
        max_chars: usize,
        actual: usize,
    },
}

impl Display for CatalogValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(column) => write!(f, "{column} must not be empty"),
            Self::TooLong {
                column,
                max_chars,
                actual,
            } => write!(
                f,
                "{column} must be at most {max_chars} characters (got {actual})"
            ),
        }
    }
}

impl Error for CatalogValidationError {}

/// One category with all of its products, ordered by product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryWithProducts {
    pub category: Category,
    pub products: Vec<Product>,
}

/// Aggregated product count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryProductCount {
    pub category_id: CategoryId,
    pub name: String,
    pub product_count: u32,
}

#[cfg(test)]
mod tests {
    use super::{CatalogValidationError, NewCategory, NewProduct, Price, PriceError};

    #[test]
    fn price_parses_and_displays_two_decimals() {
        assert_eq!("299.99".parse::<Price>().unwrap().cents(), 29_999);
        assert_eq!("40.5".parse::<Price>().unwrap().to_string(), "40.50");
        assert_eq!("20".parse::<Price>().unwrap().to_string(), "20.00");
        assert_eq!(" 0.07 ".parse::<Price>().unwrap().to_string(), "0.07");
    }

    #[test]
    fn price_rejects_out_of_column_values() {
        assert_eq!("-1.00".parse::<Price>().unwrap_err(), PriceError::Negative);
        assert!(matches!(
            "1.999".parse::<Price>().unwrap_err(),
            PriceError::TooPrecise(_)
        ));
        assert!(matches!(
            "1000000.00".parse::<Price>().unwrap_err(),
            PriceError::TooLarge(_)
        ));
        assert!(matches!(
            "12,50".parse::<Price>().unwrap_err(),
            PriceError::Malformed(_)
        ));
        assert!(matches!(
            ".50".parse::<Price>().unwrap_err(),
            PriceError::Malformed(_)
        ));
    }

    #[test]
    fn category_validation_checks_product_names() {
        let category = NewCategory::new("Books", "Printed books and e-books.")
            .with_product(NewProduct::new("x".repeat(101), Price::from_cents(100).unwrap()));
        let err = category.validate().unwrap_err();
        assert_eq!(
            err,
            CatalogValidationError::TooLong {
                column: "products.name",
                max_chars: 100,
                actual: 101,
            }
        );
    }

    #[test]
    fn category_validation_rejects_blank_name() {
        let err = NewCategory::new("  ", "desc").validate().unwrap_err();
        assert_eq!(err, CatalogValidationError::Empty("categories.name"));
    }
}
