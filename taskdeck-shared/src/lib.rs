//! # Taskdeck Shared Library
//!
//! This crate contains the types and business logic shared between the
//! Taskdeck API server and the Taskdeck client library.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing, session tokens, and session resolution
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
