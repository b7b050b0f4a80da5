//! # Error Types
//!
//! Domain-specific error types for slice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  slice-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  ├── PromotionError   - Promotion selection aborted                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  slice-db errors (separate crate)                                      │
//! │  └── DbError          - Store / cache / counter failures               │
//! │                                                                         │
//! │  counter app errors                                                    │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these ever leave the cart half-mutated: every operation that can
//! fail checks its input before touching state.

use thiserror::Error;

use crate::promotion::PromotionStep;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Finalize was requested with nothing in the cart.
    ///
    /// ## User Workflow
    /// ```text
    /// Operator presses "send" / "print"
    ///      │
    ///      ▼
    /// cart.is_empty()? ── yes ──► EmptyCart ("nothing to order")
    ///      │
    ///      no
    ///      ▼
    /// Take next order number, format message / receipt
    /// ```
    #[error("Nothing to order: the cart is empty")]
    EmptyCart,

    /// A catalog position does not exist.
    #[error("{kind} #{position} does not exist")]
    ItemNotFound { kind: &'static str, position: usize },

    /// A promotion flow was started for an item that is not a promotion.
    #[error("{0} is not a promotion")]
    NotAPromotion(String),

    /// Promotions cannot be added directly; they need a selection first.
    #[error("{0} is a promotion: choose its items first")]
    PromotionRequiresSelection(String),

    /// No promotion is currently being composed.
    #[error("No promotion in progress")]
    NoPromotionInProgress,

    /// The admin PIN did not match.
    #[error("Incorrect PIN")]
    WrongPin,

    /// Promotion selection failed; the flow was aborted.
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Promotion Error
// =============================================================================

/// Reasons a promotion flow is aborted.
///
/// Every variant means the same thing to the cart: nothing was added.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromotionError {
    /// Fewer valid item references than the promotion needs.
    #[error("Selection invalid: {required} items required, {valid} valid given")]
    IncompleteSelection { required: usize, valid: usize },

    /// The catalog has nothing that can go inside a promotion.
    #[error("No items available to include in a promotion")]
    NoEligibleItems,

    /// The operator asked for a drink but the catalog has none.
    #[error("No drinks available")]
    NoBeverages,

    /// The drink answer did not name exactly one listed drink.
    #[error("Selection invalid: choose exactly one drink")]
    InvalidBeverageChoice,

    /// A step was answered out of turn.
    #[error("Promotion is waiting for {expected:?}, not {attempted:?}")]
    OutOfOrder {
        expected: PromotionStep,
        attempted: PromotionStep,
    },

    /// The operator cancelled at a prompt.
    #[error("Promotion cancelled")]
    Cancelled,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before any catalog or cart state changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. a price that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
