//! Repository contracts and SQLite implementations.
//!
//! # Invariants
//! - Repository writes validate their requests before persistence.
//! - Repository APIs return semantic errors (`ProductNotFound`) in addition
//!   to DB transport errors.

pub mod catalog_repo;
