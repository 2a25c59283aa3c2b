//! # Error Types
//!
//! Domain-specific error types for medipos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medipos-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  medipos-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                     │
//! │  └── SaleError        - Consolidated sale transaction outcome           │
//! │                                                                         │
//! │  medipos-api errors                                                     │
//! │  └── ApiError         - What the shell sees (serialized, with code)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SaleError → ApiError → Frontend    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (medicine_id, quantities, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations raised while processing a
/// sale. They abort the whole attempt; none are silently swallowed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A cart line references a catalog entry that does not exist.
    ///
    /// ## When This Occurs
    /// - The medicine_id was mistyped by the caller
    /// - The medicine was removed from the catalog after the cart was built
    #[error("Medicine not found: {0}")]
    MedicineNotFound(String),

    /// Requested quantity exceeds available stock for some item.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart line: { medicine_id: "M1", quantity: 5 }
    ///      │
    ///      ▼
    /// Catalog says: stock = 3
    ///      │
    ///      ▼
    /// InsufficientStock { medicine_id: "M1", requested: 5, available: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 M1 in stock" and stays on the sale screen
    /// ```
    #[error("Insufficient stock for {medicine_id}: available {available}, requested {requested}")]
    InsufficientStock {
        medicine_id: String,
        requested: i64,
        available: i64,
    },

    /// A sale with zero line items has no real-world meaning.
    #[error("Cannot create an invoice with no items")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before the sale transaction opens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Caller-supplied totals disagree with the server-side recomputation
    /// from the line items.
    #[error("{field} mismatch: caller supplied {supplied}, computed {computed}")]
    TotalsMismatch {
        field: String,
        supplied: i64,
        computed: i64,
    },

    /// Collection exceeds its size cap.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
