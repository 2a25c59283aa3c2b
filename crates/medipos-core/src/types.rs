//! # Domain Types
//!
//! Core domain types for the pharmacy sale workflow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Medicine     │   │     Invoice     │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  medicine_id    │   │  invoice_number │   │  phone (key)    │       │
//! │  │  stock          │   │  totals (cents) │   │  name           │       │
//! │  │  prices (cents) │   │  created_by     │   │  email/address  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   InvoiceItem   │   │    CartLine     │  (input only)               │
//! │  │  snapshots of   │   │  what the       │                             │
//! │  │  price + cost   │   │  cashier built  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (medicine_id, invoice_number, phone) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Medicine
// =============================================================================

/// A catalog entry for a medicine.
///
/// The sale processor only reads these rows and decrements `stock`; the rest
/// of the lifecycle (create/update/delete) belongs to catalog management.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Medicine {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// External, human-assigned catalog identifier. Unique and immutable
    /// from the sale processor's perspective.
    pub medicine_id: String,

    /// Display name shown to the cashier and on the invoice.
    pub name: String,

    /// Therapeutic group (e.g., "Antibiotics").
    pub group_name: Option<String>,

    /// Supplier name.
    pub supplier: Option<String>,

    /// Current stock level. Never goes negative.
    pub stock: i64,

    /// Current acquisition cost per unit, in cents. Snapshotted onto invoice
    /// line items at sale time so historical invoices are immune to later
    /// price changes.
    pub buy_price_cents: Option<i64>,

    /// Current sale price per unit, in cents.
    pub sell_price_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Checks whether the requested quantity can be sold from current stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A persisted invoice. Created exactly once per successful sale and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,

    /// Unique, sequential, human-readable display identifier
    /// (`INV-YYYYMM-NNNN`). Uniqueness is enforced at the storage layer.
    pub invoice_number: String,

    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub doctor_name: Option<String>,

    /// Sum of line `total_price_cents`.
    pub sub_total_cents: i64,

    /// Discount applied to the whole invoice. Non-negative.
    pub discount_cents: i64,

    /// `sub_total_cents - discount_cents`.
    pub total_cents: i64,

    /// Operator identifier; defaults to [`crate::DEFAULT_CREATED_BY`].
    pub created_by: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item in an invoice.
/// Uses the snapshot pattern to freeze prices and cost at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    /// External catalog identifier of the medicine sold.
    pub medicine_id: String,
    /// Medicine name at time of sale (frozen).
    pub name: String,
    /// Quantity sold. Always positive.
    pub quantity: i64,
    /// Unit sale price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// `unit_price_cents × quantity`.
    pub total_price_cents: i64,
    /// Historical acquisition cost in cents, snapshotted from the catalog
    /// at sale time. Immune to later catalog price changes.
    pub buy_price_cents: i64,
    /// Free-text dosage instructions.
    pub instructions: Option<String>,
    /// Zero-based cart position, preserved for display and reprint.
    pub position: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer directory entry, keyed by phone for the sale processor's
/// upsert. `name` is overwritten on every sale (last-write-wins, no merge).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub phone: String,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale Input
// =============================================================================

/// One entry of the cart a sale is built from, as submitted by the caller.
///
/// `unit_price_cents` is the sale price the cashier saw; the historical buy
/// cost is NOT taken from the caller — the processor snapshots it from the
/// catalog regardless of what was submitted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub medicine_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub instructions: Option<String>,
}

impl CartLine {
    /// Line total before discount.
    #[inline]
    pub fn total_price_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// The full input of a `create-invoice` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateInvoiceInput {
    /// Optional caller-supplied invoice number. When absent the processor
    /// derives one (see [`crate::numbering`]).
    pub invoice_number: Option<String>,

    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub doctor_name: Option<String>,

    /// Ordered cart. Must be non-empty.
    pub items: Vec<CartLine>,

    /// Invoice-level discount in cents. Non-negative, at most the subtotal.
    pub discount_cents: i64,

    /// Caller-supplied subtotal, verified against the recomputation when
    /// present. The persisted value is always the recomputed one.
    pub sub_total_cents: Option<i64>,

    /// Caller-supplied grand total, verified the same way.
    pub total_cents: Option<i64>,

    /// Operator identifier. Defaults to [`crate::DEFAULT_CREATED_BY`].
    pub created_by: Option<String>,
}

impl CreateInvoiceInput {
    /// Returns the customer (name, phone) pair when both are present and
    /// non-blank. Only then does a sale trigger the customer upsert.
    pub fn customer_key(&self) -> Option<(&str, &str)> {
        let name = self.customer_name.as_deref().map(str::trim)?;
        let phone = self.customer_phone.as_deref().map(str::trim)?;
        if name.is_empty() || phone.is_empty() {
            return None;
        }
        Some((name, phone))
    }
}

// =============================================================================
// Sale Output
// =============================================================================

/// The durable outcome of a successful sale: the persisted invoice and its
/// line items in cart order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatedInvoice {
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i64, unit_price_cents: i64) -> CartLine {
        CartLine {
            medicine_id: "M1".to_string(),
            name: "Paracetamol 500mg".to_string(),
            quantity,
            unit_price_cents,
            instructions: None,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(2, 100).total_price_cents(), 200);
        assert_eq!(line(1, 0).total_price_cents(), 0);
    }

    #[test]
    fn test_customer_key_requires_both_fields() {
        let mut input = CreateInvoiceInput {
            customer_name: Some("Ayesha Khan".to_string()),
            ..Default::default()
        };
        assert!(input.customer_key().is_none());

        input.customer_phone = Some("  ".to_string());
        assert!(input.customer_key().is_none());

        input.customer_phone = Some("0300-1234567".to_string());
        assert_eq!(
            input.customer_key(),
            Some(("Ayesha Khan", "0300-1234567"))
        );
    }

    #[test]
    fn test_can_sell() {
        let medicine = Medicine {
            id: "uuid".to_string(),
            medicine_id: "M1".to_string(),
            name: "Paracetamol 500mg".to_string(),
            group_name: None,
            supplier: None,
            stock: 5,
            buy_price_cents: Some(40),
            sell_price_cents: 100,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(medicine.can_sell(5));
        assert!(!medicine.can_sell(6));
    }
}
