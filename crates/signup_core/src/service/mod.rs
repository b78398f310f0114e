//! Use-case services over repositories.

pub mod catalog_service;
