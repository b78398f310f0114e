//! Typed records produced by validation and read from catalog storage.
//!
//! # Responsibility
//! - Define the normalized registration shape (`User` + embedded `Address`).
//! - Define catalog rows and write requests for the category/product store.
//!
//! # Invariants
//! - A `User` value only exists after every field constraint passed.
//! - Catalog identifiers are assigned by storage, never by callers.

pub mod address;
pub mod catalog;
pub mod user;
