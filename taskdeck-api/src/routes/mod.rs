/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, logout, me)
/// - `tasks`: Owner-scoped task CRUD and status toggle

pub mod auth;
pub mod health;
pub mod tasks;
