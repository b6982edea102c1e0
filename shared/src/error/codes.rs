//! Unified error codes for the shop backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// No line of the order could be fulfilled
    OrderEmpty = 4002,
    /// Stock reservation lost the optimistic-concurrency race too often
    StockConflict = 4003,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product variant not found
    ProductInstanceNotFound = 6002,
    /// Category not found
    CategoryNotFound = 6003,
    /// Category still has products attached
    CategoryInUse = 6004,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Role not found
    RoleNotFound = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Store unavailable or the transaction budget was exceeded
    ServiceUnavailable = 9003,
    /// Request was cancelled before commit
    RequestCancelled = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::OrderNotFound => "Order with such an id does not exist",
            Self::OrderEmpty => "The order contains no products",
            Self::StockConflict => "Stock changed concurrently, please retry",

            Self::ProductNotFound => "Product not found",
            Self::ProductInstanceNotFound => "Product variant not found",
            Self::CategoryNotFound => "Category not found",
            Self::CategoryInUse => "Category still has products attached",

            Self::UserNotFound => "User with such an id does not exist",
            Self::RoleNotFound => "Role not found",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ServiceUnavailable => "Service temporarily unavailable",
            Self::RequestCancelled => "Request was cancelled",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.message())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,

            4001 => Self::OrderNotFound,
            4002 => Self::OrderEmpty,
            4003 => Self::StockConflict,

            6001 => Self::ProductNotFound,
            6002 => Self::ProductInstanceNotFound,
            6003 => Self::CategoryNotFound,
            6004 => Self::CategoryInUse,

            8001 => Self::UserNotFound,
            8002 => Self::RoleNotFound,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ServiceUnavailable,
            9004 => Self::RequestCancelled,

            _ => return Err(format!("Unknown error code: {}", value)),
        };
        Ok(code)
    }
}
