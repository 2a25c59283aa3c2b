//! # API Error Type
//!
//! Unified error type for action handlers.
//!
//! ## Error Handling Strategy
//! Every failure carries a human-readable `message` plus a machine-readable
//! `code`; a shell that ignores the code keeps working while a newer one can
//! branch on it:
//!
//! ```typescript
//! const res = await invoke('create-invoice', payload);
//! if (!res.success) {
//!   switch (res.code) {
//!     case 'INSUFFICIENT_STOCK': highlightCartLine(res.error); break;
//!     case 'INVALID_INPUT':      showForm(res.error); break;
//!     default:                   showError(res.error);
//!   }
//!   // stay on the sale screen so the operator can correct and resubmit
//! }
//! ```

use serde::Serialize;
use ts_rs::TS;

use medipos_core::CoreError;
use medipos_db::{DbError, SaleError};

/// API error returned from action handlers.
///
/// ## Serialization
/// ```json
/// { "code": "MEDICINE_NOT_FOUND", "message": "Medicine not found: GHOST" }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message, surfaced verbatim by the UI
    pub message: String,
}

/// Error codes for action responses.
///
/// One code per failure class of the sale workflow, plus the generic
/// plumbing codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    /// Missing/empty payload or a validation failure (400)
    InvalidInput,

    /// A cart line references a non-existent catalog entry (404)
    MedicineNotFound,

    /// Requested quantity exceeds available stock (422)
    InsufficientStock,

    /// Invoice number already taken; retryable by regenerating (409)
    DuplicateInvoiceNumber,

    /// A storage failure aborted the unit of work; nothing was applied (500)
    TransactionAborted,

    /// The action name is not part of the contract
    UnknownAction,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates an unknown-action error.
    pub fn unknown_action(action: &str) -> Self {
        ApiError::new(ErrorCode::UnknownAction, format!("Unknown action: {action}"))
    }
}

/// Converts sale outcomes to API errors.
impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Core(core) => ApiError::from(core),
            SaleError::DuplicateInvoiceNumber(number) => ApiError::new(
                ErrorCode::DuplicateInvoiceNumber,
                format!("Invoice number '{number}' already exists"),
            ),
            SaleError::TransactionAborted(db) => {
                // Log the storage detail, return a consolidated message
                tracing::error!("Sale transaction aborted: {db}");
                ApiError::new(
                    ErrorCode::TransactionAborted,
                    "Sale could not be completed; no changes were applied",
                )
            }
        }
    }
}

/// Converts core business errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match err {
            CoreError::MedicineNotFound(_) => ErrorCode::MedicineNotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::EmptyCart | CoreError::Validation(_) => ErrorCode::InvalidInput,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts database errors (from read paths) to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::error!("Database error: {err}");
        ApiError::new(ErrorCode::Internal, "Database operation failed")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::MedicineNotFound("GHOST".to_string()).into();
        assert_eq!(err.code, ErrorCode::MedicineNotFound);
        assert_eq!(err.message, "Medicine not found: GHOST");

        let err: ApiError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::DuplicateInvoiceNumber).unwrap();
        assert_eq!(json, "\"DUPLICATE_INVOICE_NUMBER\"");
    }
}
