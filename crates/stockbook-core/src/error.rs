//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule failures (not found, stock)      │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Caller-facing taxonomy shared by every layer   │
//! │                                                                         │
//! │  stockbook-db errors (separate crate)                                  │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── LedgerError      - CoreError | DbError from ledger operations     │
//! │                                                                         │
//! │  stockbook-api errors (in app)                                         │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → ApiError → Client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// The caller-facing error taxonomy.
///
/// Every error that leaves a core operation maps to exactly one kind. The API
/// layer turns kinds into status codes; caller mistakes are 4xx, storage
/// faults are 5xx.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// Referenced product does not exist or is not owned by the caller.
    NotFound,
    /// Requested sale quantity exceeds stock on hand.
    InsufficientStock,
    /// Identity missing or invalid (raised by the access boundary).
    Unauthorized,
    /// Underlying store unavailable, write conflict, or stored figures too
    /// large to aggregate.
    StorageFailure,
}

impl ErrorKind {
    /// Whether the caller caused the failure (as opposed to an operational fault).
    pub const fn is_caller_error(&self) -> bool {
        !matches!(self, ErrorKind::StorageFailure)
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found for this user.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist
    /// - Product exists but belongs to another user (indistinguishable on purpose)
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Record sale (qty: 5)
    ///      │
    ///      ▼
    /// Guarded decrement: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Client shows: "Only 3 in stock"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// An aggregate over stored rows does not fit in i64 cents.
    #[error("{figure} is too large to report")]
    AmountOverflow { figure: &'static str },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the taxonomy kind for this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ProductNotFound(_) => ErrorKind::NotFound,
            CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CoreError::AmountOverflow { .. } => ErrorKind::StorageFailure,
            CoreError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised on typed input structs before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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
    MustNotBeNegative { field: String },

    /// Arithmetic on the input would overflow.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
