//! # Action Handlers
//!
//! The action contract both shells consume. A shell delivers
//! `(action name, JSON payload)` pairs — over Tauri IPC on desktop, over an
//! HTTP handler on the web — and receives the same [`ActionResponse`]
//! envelope either way.

use serde_json::Value;
use tracing::debug;

use crate::dto::{ActionResponse, CreateInvoiceRequest, InvoiceDto};
use crate::error::ApiError;
use medipos_core::CreateInvoiceInput;
use medipos_db::Database;

/// Action name for sale processing.
pub const CREATE_INVOICE: &str = "create-invoice";

/// Dispatches an action by name.
///
/// Unknown actions come back as a failure envelope rather than a transport
/// error, so shells handle them uniformly.
pub async fn dispatch(db: &Database, action: &str, payload: Value) -> ActionResponse {
    debug!(action = %action, "Dispatching action");

    match action {
        CREATE_INVOICE => match create_invoice(db, payload).await {
            Ok(invoice) => ActionResponse::ok(invoice),
            Err(err) => ActionResponse::err(err),
        },
        other => ActionResponse::err(ApiError::unknown_action(other)),
    }
}

/// Handles `create-invoice`: decodes the payload, runs the sale processor,
/// and returns the full persisted invoice document.
pub async fn create_invoice(db: &Database, payload: Value) -> Result<InvoiceDto, ApiError> {
    if payload.is_null() || payload.as_object().is_some_and(|obj| obj.is_empty()) {
        return Err(ApiError::invalid_input("No data provided"));
    }

    let request: CreateInvoiceRequest = serde_json::from_value(payload)
        .map_err(|err| ApiError::invalid_input(format!("Invalid payload: {err}")))?;

    let input = CreateInvoiceInput::from(request);
    let created = db.sales().create_invoice(&input).await?;

    Ok(InvoiceDto::from(created))
}

// =============================================================================
// Unit Tests
// =============================================================================
