//! # Wire DTOs
//!
//! camelCase data transfer objects for the action contract. Kept separate
//! from the core domain types so the wire shape can evolve without touching
//! business logic; `ts-rs` exports them for the JS shells.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ApiError, ErrorCode};
use medipos_core::{CartLine, CreateInvoiceInput, CreatedInvoice};

// =============================================================================
// Request
// =============================================================================

/// One cart line as submitted over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineDto {
    pub medicine_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// The `create-invoice` request payload.
///
/// Every field except `items` is optional; totals, when supplied, are
/// verified against the server-side recomputation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub items: Vec<CartLineDto>,
    #[serde(default)]
    pub discount_cents: i64,
    #[serde(default)]
    pub sub_total_cents: Option<i64>,
    #[serde(default)]
    pub total_cents: Option<i64>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl From<CreateInvoiceRequest> for CreateInvoiceInput {
    fn from(req: CreateInvoiceRequest) -> Self {
        CreateInvoiceInput {
            invoice_number: req.invoice_number,
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            doctor_name: req.doctor_name,
            items: req
                .items
                .into_iter()
                .map(|line| CartLine {
                    medicine_id: line.medicine_id,
                    name: line.name,
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price_cents,
                    instructions: line.instructions,
                })
                .collect(),
            discount_cents: req.discount_cents,
            sub_total_cents: req.sub_total_cents,
            total_cents: req.total_cents,
            created_by: req.created_by,
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// One persisted line item on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceItemDto {
    pub medicine_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
    pub buy_price_cents: i64,
    pub instructions: Option<String>,
}

/// The full persisted invoice document returned on success.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceDto {
    pub id: String,
    pub invoice_number: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub doctor_name: Option<String>,
    pub items: Vec<InvoiceItemDto>,
    pub sub_total_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub created_by: String,
    pub created_at: String,
}

impl From<CreatedInvoice> for InvoiceDto {
    fn from(created: CreatedInvoice) -> Self {
        InvoiceDto {
            id: created.invoice.id,
            invoice_number: created.invoice.invoice_number,
            customer_name: created.invoice.customer_name,
            customer_phone: created.invoice.customer_phone,
            doctor_name: created.invoice.doctor_name,
            items: created
                .items
                .into_iter()
                .map(|item| InvoiceItemDto {
                    medicine_id: item.medicine_id,
                    name: item.name,
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price_cents,
                    total_price_cents: item.total_price_cents,
                    buy_price_cents: item.buy_price_cents,
                    instructions: item.instructions,
                })
                .collect(),
            sub_total_cents: created.invoice.sub_total_cents,
            discount_cents: created.invoice.discount_cents,
            total_cents: created.invoice.total_cents,
            created_by: created.invoice.created_by,
            created_at: created.invoice.created_at.to_rfc3339(),
        }
    }
}

/// The response envelope every action returns.
///
/// ```json
/// { "success": true, "invoice": { ... } }
/// { "success": false, "error": "Insufficient stock ...", "code": "INSUFFICIENT_STOCK" }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ActionResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoiceDto>,

    /// Human-readable message, surfaced verbatim by the shell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Machine-readable code for programmatic handling in the shells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl ActionResponse {
    /// Success envelope carrying the persisted invoice.
    pub fn ok(invoice: InvoiceDto) -> Self {
        ActionResponse {
            success: true,
            invoice: Some(invoice),
            error: None,
            code: None,
        }
    }

    /// Failure envelope.
    pub fn err(error: ApiError) -> Self {
        ActionResponse {
            success: false,
            invoice: None,
            error: Some(error.message),
            code: Some(error.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_minimal_payload() {
        let req: CreateInvoiceRequest = serde_json::from_value(serde_json::json!({
            "items": [
                { "medicineId": "M1", "name": "Paracetamol", "quantity": 2, "unitPriceCents": 100 }
            ]
        }))
        .unwrap();

        assert_eq!(req.items.len(), 1);
        assert_eq!(req.items[0].medicine_id, "M1");
        assert_eq!(req.discount_cents, 0);
        assert!(req.invoice_number.is_none());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let response = ActionResponse::err(ApiError::invalid_input("No data provided"));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No data provided");
        assert_eq!(json["code"], "INVALID_INPUT");
        assert!(json.get("invoice").is_none());
    }
}
