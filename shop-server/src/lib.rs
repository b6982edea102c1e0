//! Shop Server — business-logic and data-access layer of the online shop
//!
//! # Module structure
//!
//! ```text
//! shop-server/src/
//! ├── core/          # Config, state, HTTP server
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── orders/        # Order-creation core (intake → catalog → reservation → persist)
//! ├── services/      # Image storage
//! └── utils/         # Logger, validation, error re-exports
//! ```
//!
//! The order-creation transaction in `orders/` is the heart of the crate:
//! it resolves requested lines against product variants, applies the
//! skip/clamp availability policy, and commits the order together with its
//! stock decrements in one transaction, tolerating concurrent buyers via
//! optimistic versioning.

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use orders::OrderError;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
