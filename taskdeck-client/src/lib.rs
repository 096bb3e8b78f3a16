//! # Taskdeck Client Library
//!
//! Typed client for the Taskdeck API. Three layers:
//!
//! - [`http::ApiClient`]: one method per API route, with the session
//!   cookie carried automatically between calls
//! - [`session::Session`]: the client-side auth state machine
//!   (uninitialized → loading → authenticated | anonymous)
//! - [`board::TaskBoard`]: the task-list view model; mutations are
//!   followed by a full refetch, and status filtering is purely local
//!
//! ## Example
//!
//! ```no_run
//! use taskdeck_client::{http::ApiClient, session::Session, board::TaskBoard};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), taskdeck_client::error::ClientError> {
//! let client = Arc::new(ApiClient::new("http://localhost:8080")?);
//!
//! let mut session = Session::new(client.clone());
//! session.initialize().await;
//!
//! if !session.is_authenticated() {
//!     session.login("jane@example.com", "secret123").await?;
//! }
//!
//! let mut board = TaskBoard::new(client);
//! board.refresh().await?;
//! board.create("Buy milk", None).await?;
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod error;
pub mod http;
pub mod session;

pub use board::{StatusFilter, TaskBoard};
pub use error::ClientError;
pub use http::ApiClient;
pub use session::{Session, SessionState};
