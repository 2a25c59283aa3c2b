//! # Sale Processor
//!
//! The single transactional unit of work that turns a proposed cart plus
//! customer/doctor metadata into a durable, internally consistent invoice,
//! while enforcing stock availability.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     create_invoice(input)                               │
//! │                                                                         │
//! │  0. VALIDATE (pure, before the transaction opens)                       │
//! │     └── quantities, prices, discount, totals consistency                │
//! │                                                                         │
//! │  ── BEGIN TRANSACTION ──────────────────────────────────────────────    │
//! │  1. NUMBER    count archive → INV-YYYYMM-NNNN (unless supplied)         │
//! │  2. PER ITEM, in cart order:                                            │
//! │     ├── look up by medicine_id   → MedicineNotFound                     │
//! │     ├── stock < quantity?        → InsufficientStock                    │
//! │     ├── decrement stock                                                 │
//! │     └── snapshot buy_price onto the line item                           │
//! │  3. INSERT    invoice + line items (unique invoice_number)              │
//! │  4. UPSERT    customer by phone (when name + phone present)             │
//! │  ── COMMIT ─────────────────────────────────────────────────────────    │
//! │                                                                         │
//! │  Any failure inside the transaction rolls everything back: no partial   │
//! │  stock decrement, no orphan invoice, ever.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Numbering Collisions
//! The display sequence is derived from a count-at-call-time, so two sales
//! committing in the same instant can compute the same number. The UNIQUE
//! constraint on `invoice_number` is the correctness backstop: a collision
//! on a *generated* number aborts the attempt and the whole transaction is
//! retried with a bumped sequence (bounded). A collision on a
//! *caller-supplied* number is surfaced immediately.
//!
//! ## Concurrency
//! Multiple cashiers can submit sales concurrently; there is no client-side
//! locking. Correctness relies entirely on the storage layer: SQLite
//! serializes writers, and a transaction that loses the race fails cleanly
//! as `TransactionAborted` with no partial state.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::repository::generate_row_id;
use medipos_core::numbering::derive_invoice_number;
use medipos_core::{
    validation, CoreError, CreateInvoiceInput, CreatedInvoice, Invoice, InvoiceItem, Medicine,
    DEFAULT_CREATED_BY, MAX_NUMBERING_ATTEMPTS,
};

// =============================================================================
// Error Type
// =============================================================================

/// Consolidated outcome of a failed sale attempt.
///
/// Exactly one of these reaches the caller; by the time it does, the
/// transaction has been rolled back and no partial state is visible.
#[derive(Debug, Error)]
pub enum SaleError {
    /// A business rule was violated (unknown medicine, insufficient stock,
    /// empty cart, invalid input).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The invoice number already exists in the archive. Retryable when the
    /// number was generated; fatal when the caller supplied it.
    #[error("Duplicate invoice number: {0}")]
    DuplicateInvoiceNumber(String),

    /// A storage failure surfaced while the transaction was open.
    #[error("Transaction aborted: {0}")]
    TransactionAborted(#[from] DbError),
}

/// Result type for sale processing.
pub type SaleResult<T> = Result<T, SaleError>;

// =============================================================================
// Sale Processor
// =============================================================================

const MEDICINE_COLUMNS: &str = "id, medicine_id, name, group_name, supplier, stock, \
     buy_price_cents, sell_price_cents, created_at, updated_at";

/// The sale processor: sole writer of stock decrements and sole creator of
/// invoices.
#[derive(Debug, Clone)]
pub struct SaleProcessor {
    pool: SqlitePool,
}

impl SaleProcessor {
    /// Creates a new SaleProcessor.
    pub fn new(pool: SqlitePool) -> Self {
        SaleProcessor { pool }
    }

    /// Processes a sale: validates the cart, decrements stock, snapshots
    /// historical cost, allocates an invoice number, persists the invoice
    /// and upserts the customer — all or nothing.
    ///
    /// ## Returns
    /// * `Ok(CreatedInvoice)` - the full persisted invoice document
    /// * `Err(SaleError)` - which step and which item failed; no partial
    ///   state remains
    pub async fn create_invoice(&self, input: &CreateInvoiceInput) -> SaleResult<CreatedInvoice> {
        validation::validate_sale_input(input).map_err(CoreError::from)?;

        if input.items.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let mut attempt: u32 = 0;
        loop {
            match self.try_create(input, attempt).await {
                Err(SaleError::DuplicateInvoiceNumber(number))
                    if input.invoice_number.is_none()
                        && attempt + 1 < MAX_NUMBERING_ATTEMPTS =>
                {
                    // Lost a numbering race; rerun the whole transaction
                    // with a bumped sequence.
                    warn!(number = %number, attempt, "Invoice number collision, regenerating");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// One full transactional attempt. Dropping the transaction on any early
    /// return rolls back every write made so far.
    async fn try_create(
        &self,
        input: &CreateInvoiceInput,
        attempt: u32,
    ) -> SaleResult<CreatedInvoice> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let now = Utc::now();

        // Step 1: invoice numbering
        let invoice_number = match &input.invoice_number {
            Some(number) => number.clone(),
            None => {
                let existing_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(DbError::from)?;
                derive_invoice_number(now, existing_count, attempt)
            }
        };

        debug!(invoice_number = %invoice_number, items = input.items.len(), "Processing sale");

        // Step 2: per-item stock check, decrement, and cost snapshot —
        // sequentially, in cart order, stopping at the first failure
        let invoice_id = generate_row_id();
        let mut items = Vec::with_capacity(input.items.len());

        for (position, line) in input.items.iter().enumerate() {
            let sql = format!("SELECT {MEDICINE_COLUMNS} FROM medicines WHERE medicine_id = ?1");
            let medicine = sqlx::query_as::<_, Medicine>(&sql)
                .bind(&line.medicine_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(DbError::from)?
                .ok_or_else(|| CoreError::MedicineNotFound(line.medicine_id.clone()))?;

            if !medicine.can_sell(line.quantity) {
                return Err(CoreError::InsufficientStock {
                    medicine_id: line.medicine_id.clone(),
                    requested: line.quantity,
                    available: medicine.stock,
                }
                .into());
            }

            // Guarded decrement: the WHERE clause re-asserts availability so
            // a racing writer can never push stock negative.
            let result = sqlx::query(
                "UPDATE medicines \
                 SET stock = stock - ?2, updated_at = ?3 \
                 WHERE medicine_id = ?1 AND stock >= ?2",
            )
            .bind(&line.medicine_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if result.rows_affected() == 0 {
                return Err(CoreError::InsufficientStock {
                    medicine_id: line.medicine_id.clone(),
                    requested: line.quantity,
                    available: medicine.stock,
                }
                .into());
            }

            items.push(InvoiceItem {
                id: generate_row_id(),
                invoice_id: invoice_id.clone(),
                medicine_id: line.medicine_id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                total_price_cents: line.total_price_cents(),
                // Historical cost comes from the catalog, never the caller
                buy_price_cents: medicine.buy_price_cents.unwrap_or(0),
                instructions: line.instructions.clone(),
                position: position as i64,
                created_at: now,
            });
        }

        // Step 3: invoice persistence, with recomputed totals
        let sub_total_cents = validation::compute_sub_total_cents(&input.items);
        let invoice = Invoice {
            id: invoice_id,
            invoice_number,
            customer_name: input.customer_name.clone(),
            customer_phone: input.customer_phone.clone(),
            doctor_name: input.doctor_name.clone(),
            sub_total_cents,
            discount_cents: input.discount_cents,
            total_cents: sub_total_cents - input.discount_cents,
            created_by: input
                .created_by
                .clone()
                .unwrap_or_else(|| DEFAULT_CREATED_BY.to_string()),
            created_at: now,
        };

        if let Err(err) = sqlx::query(
            "INSERT INTO invoices ( \
                 id, invoice_number, customer_name, customer_phone, doctor_name, \
                 sub_total_cents, discount_cents, total_cents, created_by, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&invoice.id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.customer_name)
        .bind(&invoice.customer_phone)
        .bind(&invoice.doctor_name)
        .bind(invoice.sub_total_cents)
        .bind(invoice.discount_cents)
        .bind(invoice.total_cents)
        .bind(&invoice.created_by)
        .bind(invoice.created_at)
        .execute(&mut *tx)
        .await
        {
            let db_err = DbError::from(err);
            return Err(if db_err.violates_unique("invoice_number") {
                SaleError::DuplicateInvoiceNumber(invoice.invoice_number.clone())
            } else {
                SaleError::TransactionAborted(db_err)
            });
        }

        for item in &items {
            sqlx::query(
                "INSERT INTO invoice_items ( \
                     id, invoice_id, medicine_id, name, quantity, unit_price_cents, \
                     total_price_cents, buy_price_cents, instructions, position, created_at \
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )
            .bind(&item.id)
            .bind(&item.invoice_id)
            .bind(&item.medicine_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.total_price_cents)
            .bind(item.buy_price_cents)
            .bind(&item.instructions)
            .bind(item.position)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        // Step 4: customer upsert, keyed by phone, last-write-wins on name
        if let Some((name, phone)) = input.customer_key() {
            sqlx::query(
                "INSERT INTO customers (id, phone, name, email, address, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, NULL, NULL, ?4, ?4) \
                 ON CONFLICT (phone) DO UPDATE \
                 SET name = excluded.name, updated_at = excluded.updated_at",
            )
            .bind(generate_row_id())
            .bind(phone)
            .bind(name)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        // Step 5: commit
        tx.commit().await.map_err(DbError::from)?;

        info!(
            invoice_number = %invoice.invoice_number,
            total_cents = invoice.total_cents,
            items = items.len(),
            "Sale committed"
        );

        Ok(CreatedInvoice { invoice, items })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use medipos_core::numbering::matches_invoice_number_format;
    use medipos_core::CartLine;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_medicine(
        db: &Database,
        medicine_id: &str,
        stock: i64,
        buy_price_cents: Option<i64>,
        sell_price_cents: i64,
    ) {
        let now = Utc::now();
        db.medicines()
            .insert(&Medicine {
                id: generate_row_id(),
                medicine_id: medicine_id.to_string(),
                name: format!("Medicine {medicine_id}"),
                group_name: None,
                supplier: None,
                stock,
                buy_price_cents,
                sell_price_cents,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    fn line(medicine_id: &str, quantity: i64, unit_price_cents: i64) -> CartLine {
        CartLine {
            medicine_id: medicine_id.to_string(),
            name: format!("Medicine {medicine_id}"),
            quantity,
            unit_price_cents,
            instructions: None,
        }
    }

    fn cart(items: Vec<CartLine>) -> CreateInvoiceInput {
        CreateInvoiceInput {
            items,
            ..Default::default()
        }
    }

    async fn stock_of(db: &Database, medicine_id: &str) -> i64 {
        db.medicines()
            .get_by_medicine_id(medicine_id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    #[tokio::test]
    async fn test_successful_sale() {
        let db = test_db().await;
        add_medicine(&db, "M1", 5, Some(40), 100).await;

        let created = db
            .sales()
            .create_invoice(&cart(vec![line("M1", 2, 100)]))
            .await
            .unwrap();

        // Stock decremented by exactly the quantity sold
        assert_eq!(stock_of(&db, "M1").await, 3);

        // One line item with computed total and snapshotted cost
        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].total_price_cents, 200);
        assert_eq!(created.items[0].buy_price_cents, 40);

        // Generated number follows the INV-YYYYMM-NNNN pattern
        assert!(matches_invoice_number_format(
            &created.invoice.invoice_number
        ));
        assert!(created.invoice.invoice_number.ends_with("-0001"));

        // Recomputed totals and fallback operator
        assert_eq!(created.invoice.sub_total_cents, 200);
        assert_eq!(created.invoice.total_cents, 200);
        assert_eq!(created.invoice.created_by, DEFAULT_CREATED_BY);

        // Invoice is durable and readable back
        let fetched = db
            .invoices()
            .get_by_number(&created.invoice.invoice_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, created.invoice.id);
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_stock_untouched() {
        let db = test_db().await;
        add_medicine(&db, "M1", 1, Some(40), 100).await;

        let err = db
            .sales()
            .create_invoice(&cart(vec![line("M1", 2, 100)]))
            .await
            .unwrap_err();

        match err {
            SaleError::Core(CoreError::InsufficientStock {
                medicine_id,
                requested,
                available,
            }) => {
                assert_eq!(medicine_id, "M1");
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&db, "M1").await, 1);
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_medicine_creates_nothing() {
        let db = test_db().await;

        let err = db
            .sales()
            .create_invoice(&cart(vec![line("GHOST", 1, 100)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SaleError::Core(CoreError::MedicineNotFound(ref id)) if id == "GHOST"
        ));
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failure_rolls_back_earlier_decrements() {
        let db = test_db().await;
        add_medicine(&db, "M1", 5, Some(40), 100).await;
        add_medicine(&db, "M2", 1, Some(30), 80).await;

        // M1 succeeds, then M2 fails its stock check: the whole cart must
        // leave no trace
        let err = db
            .sales()
            .create_invoice(&cart(vec![line("M1", 2, 100), line("M2", 5, 80)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SaleError::Core(CoreError::InsufficientStock { .. })
        ));
        assert_eq!(stock_of(&db, "M1").await, 5);
        assert_eq!(stock_of(&db, "M2").await, 1);
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_historical_cost_immune_to_later_price_changes() {
        let db = test_db().await;
        add_medicine(&db, "M1", 5, Some(40), 100).await;

        let created = db
            .sales()
            .create_invoice(&cart(vec![line("M1", 1, 100)]))
            .await
            .unwrap();

        db.medicines().set_prices("M1", Some(9999), 100).await.unwrap();

        let items = db.invoices().get_items(&created.invoice.id).await.unwrap();
        assert_eq!(items[0].buy_price_cents, 40);
    }

    #[tokio::test]
    async fn test_missing_buy_price_snapshots_zero() {
        let db = test_db().await;
        add_medicine(&db, "M1", 5, None, 100).await;

        let created = db
            .sales()
            .create_invoice(&cart(vec![line("M1", 1, 100)]))
            .await
            .unwrap();

        assert_eq!(created.items[0].buy_price_cents, 0);
    }

    #[tokio::test]
    async fn test_customer_upsert_last_write_wins() {
        let db = test_db().await;
        add_medicine(&db, "M1", 10, Some(40), 100).await;

        let mut first = cart(vec![line("M1", 1, 100)]);
        first.customer_name = Some("Ayesha Khan".to_string());
        first.customer_phone = Some("0300-1234567".to_string());
        db.sales().create_invoice(&first).await.unwrap();

        let mut second = cart(vec![line("M1", 1, 100)]);
        second.customer_name = Some("A. Khan".to_string());
        second.customer_phone = Some("0300-1234567".to_string());
        db.sales().create_invoice(&second).await.unwrap();

        assert_eq!(db.customers().count().await.unwrap(), 1);
        let customer = db
            .customers()
            .find_by_phone("0300-1234567")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.name, "A. Khan");
    }

    #[tokio::test]
    async fn test_no_upsert_without_both_name_and_phone() {
        let db = test_db().await;
        add_medicine(&db, "M1", 10, Some(40), 100).await;

        let mut input = cart(vec![line("M1", 1, 100)]);
        input.customer_name = Some("Walk-in".to_string());
        db.sales().create_invoice(&input).await.unwrap();

        assert_eq!(db.customers().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sequential_numbering() {
        let db = test_db().await;
        add_medicine(&db, "M1", 10, Some(40), 100).await;

        let a = db
            .sales()
            .create_invoice(&cart(vec![line("M1", 1, 100)]))
            .await
            .unwrap();
        let b = db
            .sales()
            .create_invoice(&cart(vec![line("M1", 1, 100)]))
            .await
            .unwrap();

        assert!(a.invoice.invoice_number.ends_with("-0001"));
        assert!(b.invoice.invoice_number.ends_with("-0002"));
        assert_ne!(a.invoice.invoice_number, b.invoice.invoice_number);
    }

    #[tokio::test]
    async fn test_collision_on_generated_number_retries() {
        let db = test_db().await;
        add_medicine(&db, "M1", 5, Some(40), 100).await;

        // Occupy the number the next sale will derive: archive count will be
        // 1, so the first attempt computes sequence 2
        let occupied = derive_invoice_number(Utc::now(), 1, 0);
        sqlx::query(
            "INSERT INTO invoices ( \
                 id, invoice_number, sub_total_cents, discount_cents, total_cents, \
                 created_by, created_at \
             ) VALUES (?1, ?2, 0, 0, 0, 'admin', ?3)",
        )
        .bind(generate_row_id())
        .bind(&occupied)
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();

        let created = db
            .sales()
            .create_invoice(&cart(vec![line("M1", 2, 100)]))
            .await
            .unwrap();

        // Second attempt bumped the sequence past the occupied number
        let expected = derive_invoice_number(Utc::now(), 1, 1);
        assert_eq!(created.invoice.invoice_number, expected);

        // The rolled-back first attempt must not have decremented stock
        assert_eq!(stock_of(&db, "M1").await, 3);
    }

    #[tokio::test]
    async fn test_supplied_duplicate_number_fails_without_retry() {
        let db = test_db().await;
        add_medicine(&db, "M1", 10, Some(40), 100).await;

        let mut input = cart(vec![line("M1", 2, 100)]);
        input.invoice_number = Some("CUSTOM-1".to_string());
        db.sales().create_invoice(&input).await.unwrap();

        let err = db.sales().create_invoice(&input).await.unwrap_err();
        assert!(matches!(
            err,
            SaleError::DuplicateInvoiceNumber(ref n) if n == "CUSTOM-1"
        ));

        // Only the first sale touched stock
        assert_eq!(stock_of(&db, "M1").await, 8);
        assert_eq!(db.invoices().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let db = test_db().await;

        let err = db.sales().create_invoice(&cart(vec![])).await.unwrap_err();
        assert!(matches!(err, SaleError::Core(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_totals_mismatch_rejected_before_any_write() {
        let db = test_db().await;
        add_medicine(&db, "M1", 5, Some(40), 100).await;

        let mut input = cart(vec![line("M1", 2, 100)]);
        input.total_cents = Some(1); // inconsistent with 2 × 100
        let err = db.sales().create_invoice(&input).await.unwrap_err();

        assert!(matches!(err, SaleError::Core(CoreError::Validation(_))));
        assert_eq!(stock_of(&db, "M1").await, 5);
    }

    #[tokio::test]
    async fn test_discount_and_created_by_passthrough() {
        let db = test_db().await;
        add_medicine(&db, "M1", 5, Some(40), 100).await;

        let mut input = cart(vec![line("M1", 2, 100)]);
        input.discount_cents = 50;
        input.created_by = Some("dr.iqbal".to_string());
        input.doctor_name = Some("Dr. Iqbal".to_string());

        let created = db.sales().create_invoice(&input).await.unwrap();
        assert_eq!(created.invoice.sub_total_cents, 200);
        assert_eq!(created.invoice.discount_cents, 50);
        assert_eq!(created.invoice.total_cents, 150);
        assert_eq!(created.invoice.created_by, "dr.iqbal");
        assert_eq!(created.invoice.doctor_name.as_deref(), Some("Dr. Iqbal"));
    }

    #[tokio::test]
    async fn test_unrelated_catalog_entries_unchanged() {
        let db = test_db().await;
        add_medicine(&db, "M1", 5, Some(40), 100).await;
        add_medicine(&db, "M2", 7, Some(30), 80).await;

        db.sales()
            .create_invoice(&cart(vec![line("M1", 2, 100)]))
            .await
            .unwrap();

        assert_eq!(stock_of(&db, "M2").await, 7);
    }
}
