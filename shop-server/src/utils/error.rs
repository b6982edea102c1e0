//! Error types — re-exported from the shared crate so server code has a
//! single import path

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
