//! Registration validation core.
//!
//! `validation` turns one JSON registration document into a normalized
//! `User` or a complete list of violations. The catalog modules (`db`,
//! `repo`, `service`) hold the category/product store and are independent of
//! validation.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::address::Address;
pub use model::catalog::{
    Category, CategoryId, CategoryProductCount, CategoryWithProducts, NewCategory, NewProduct,
    Price, PriceError, Product, ProductId,
};
pub use model::user::User;
pub use repo::catalog_repo::{CatalogRepository, RepoError, RepoResult, SqliteCatalogRepository};
pub use service::catalog_service::{
    CatalogService, CatalogServiceError, PriceChange, SeedOutcome,
};
pub use validation::{
    normalize, validate, validate_value, validate_with, FieldAliases, HouseNumberPolicy,
    ParseError, RegistrationError, ValidationFailure, ValidatorOptions, Violation, ViolationKind,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
