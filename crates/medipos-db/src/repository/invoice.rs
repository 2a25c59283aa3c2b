//! # Invoice Repository
//!
//! Read side of the invoice archive.
//!
//! The archive is append-only: invoices are created exactly once, by the
//! sale transaction in [`crate::sale`], and never mutated afterwards. No
//! update or delete path exists by design, so this repository only reads.

use sqlx::SqlitePool;

use crate::error::DbResult;
use medipos_core::{Invoice, InvoiceItem};

const INVOICE_COLUMNS: &str = "id, invoice_number, customer_name, customer_phone, doctor_name, \
     sub_total_cents, discount_cents, total_cents, created_by, created_at";

const ITEM_COLUMNS: &str = "id, invoice_id, medicine_id, name, quantity, unit_price_cents, \
     total_price_cents, buy_price_cents, instructions, position, created_at";

/// Repository for invoice archive reads.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Counts all invoices in the archive.
    ///
    /// This is the same count the numbering policy derives its display
    /// sequence from (the processor re-reads it inside its transaction).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Gets an invoice by its human-readable number.
    pub async fn get_by_number(&self, invoice_number: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_number = ?1"
        ))
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets all line items of an invoice, in cart order.
    pub async fn get_items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItem>> {
        let items = sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = ?1 ORDER BY position"
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the most recently created invoices.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at DESC, id DESC LIMIT ?1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
// End-to-end coverage of invoice creation lives in sale.rs; these tests only
// exercise the read paths against rows the processor created.
