//! # App Error Type
//!
//! Unified error type for counter commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Counter                            │
//! │                                                                         │
//! │  Operator types `send`                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  AppResult<()>                                                   │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── DbError::QueryFailed("...") ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Order Error? ──── CoreError::EmptyCart ───────── AppError ────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The command loop prints `message` and keeps going. Only errors with   │
//! │  code Io or Config end the program.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use slice_core::CoreError;
use slice_db::DbError;

use crate::state::ConfigError;

/// Error returned from counter commands.
#[derive(Debug, Clone)]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// What the operator reads
    pub message: String,
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Catalog position or cart line does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Storage operation failed
    DatabaseError,

    /// The order can't do that right now (empty cart, bad selection)
    BusinessLogic,

    /// Wrong admin PIN
    Unauthorized,

    /// Configuration could not be loaded or is invalid
    Config,

    /// Terminal or file I/O failed
    Io,

    /// Anything else
    Internal,
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::NotFound, message)
    }

    /// True for errors that should stop the program instead of the command.
    pub fn is_fatal(&self) -> bool {
        matches!(self.code, ErrorCode::Io | ErrorCode::Config)
    }
}

/// Converts storage errors to app errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but show a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            DbError::Io(e) => AppError::new(ErrorCode::Io, format!("Cache I/O failed: {}", e)),
            DbError::Serialization(e) => {
                tracing::error!("Stored document invalid: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Stored catalog is unreadable")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ItemNotFound { .. } => ErrorCode::NotFound,
            CoreError::WrongPin => ErrorCode::Unauthorized,
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::EmptyCart
            | CoreError::NotAPromotion(_)
            | CoreError::PromotionRequiresSelection(_)
            | CoreError::NoPromotionInProgress
            | CoreError::Promotion(_) => ErrorCode::BusinessLogic,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::Config, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::Io, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for counter commands.
pub type AppResult<T> = Result<T, AppError>;
