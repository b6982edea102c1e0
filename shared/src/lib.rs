//! Shared types for the shop backend workspace.
//!
//! This crate holds everything the server and its clients agree on:
//!
//! - **Models** (`models`): catalog, order, category and user entities plus
//!   their create/update payloads and wire views
//! - **Errors** (`error`): unified error codes, [`AppError`] and the
//!   [`ApiResponse`] envelope
//! - **Utilities** (`util`): millisecond timestamps, snowflake IDs,
//!   RFC 3339 rendering

pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
