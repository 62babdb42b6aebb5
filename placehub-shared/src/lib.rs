//! # Placehub Shared Library
//!
//! This crate contains the data layer shared by the Placehub API server:
//! database models, connection pooling, migrations, and password hashing.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `db`: Connection pool and migration runner
//! - `auth`: Password hashing and verification

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Placehub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
