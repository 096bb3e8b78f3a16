/// Database models for Taskdeck
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and the public profile shape
/// - `task`: Per-user tasks with a two-state status

pub mod task;
pub mod user;
