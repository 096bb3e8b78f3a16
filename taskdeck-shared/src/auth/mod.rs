/// Authentication utilities
///
/// This module provides the auth primitives for Taskdeck:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Signed, time-bound session tokens (HS256 JWT)
/// - [`session`]: Resolving a request's token to the authenticated user
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with per-password random salts
/// - **Session Tokens**: HS256 signing with configurable expiration,
///   no server-side session storage
/// - **Constant-time Comparison**: password verification never
///   short-circuits on content

pub mod password;
pub mod session;
pub mod token;
