//! # Medicine Repository
//!
//! Database operations for the medicine catalog.
//!
//! The sale processor does not use this repository for its decrements — those
//! run inside the sale transaction in [`crate::sale`]. What lives here is the
//! catalog-management surface: inserts, restocking, price updates, lookups.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use medipos_core::Medicine;

const MEDICINE_COLUMNS: &str = "id, medicine_id, name, group_name, supplier, stock, \
     buy_price_cents, sell_price_cents, created_at, updated_at";

/// Repository for medicine catalog operations.
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    /// Creates a new MedicineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    /// Gets a catalog entry by its external medicine identifier.
    ///
    /// ## Returns
    /// * `Ok(Some(Medicine))` - entry found
    /// * `Ok(None)` - no entry with that identifier
    pub async fn get_by_medicine_id(&self, medicine_id: &str) -> DbResult<Option<Medicine>> {
        let medicine = sqlx::query_as::<_, Medicine>(&format!(
            "SELECT {MEDICINE_COLUMNS} FROM medicines WHERE medicine_id = ?1"
        ))
        .bind(medicine_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(medicine)
    }

    /// Inserts a new catalog entry.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - medicine_id already exists
    pub async fn insert(&self, medicine: &Medicine) -> DbResult<()> {
        debug!(medicine_id = %medicine.medicine_id, "Inserting medicine");

        sqlx::query(
            "INSERT INTO medicines ( \
                 id, medicine_id, name, group_name, supplier, stock, \
                 buy_price_cents, sell_price_cents, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&medicine.id)
        .bind(&medicine.medicine_id)
        .bind(&medicine.name)
        .bind(&medicine.group_name)
        .bind(&medicine.supplier)
        .bind(medicine.stock)
        .bind(medicine.buy_price_cents)
        .bind(medicine.sell_price_cents)
        .bind(medicine.created_at)
        .bind(medicine.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies a stock delta (positive for restocking).
    ///
    /// The update is guarded so stock can never go negative; a delta that
    /// would do so affects zero rows and reports NotFound-style failure
    /// against the guarded row.
    pub async fn update_stock(&self, medicine_id: &str, delta: i64) -> DbResult<()> {
        debug!(medicine_id = %medicine_id, delta = %delta, "Updating stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE medicines \
             SET stock = stock + ?2, updated_at = ?3 \
             WHERE medicine_id = ?1 AND stock + ?2 >= 0",
        )
        .bind(medicine_id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medicine", medicine_id));
        }

        Ok(())
    }

    /// Updates catalog prices.
    ///
    /// Changing `buy_price_cents` here never touches already-created
    /// invoices: line items carry their own snapshotted cost.
    pub async fn set_prices(
        &self,
        medicine_id: &str,
        buy_price_cents: Option<i64>,
        sell_price_cents: i64,
    ) -> DbResult<()> {
        debug!(medicine_id = %medicine_id, "Updating prices");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE medicines \
             SET buy_price_cents = ?2, sell_price_cents = ?3, updated_at = ?4 \
             WHERE medicine_id = ?1",
        )
        .bind(medicine_id)
        .bind(buy_price_cents)
        .bind(sell_price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medicine", medicine_id));
        }

        Ok(())
    }

    /// Counts catalog entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicines")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::generate_row_id;

    fn medicine(medicine_id: &str, stock: i64) -> Medicine {
        let now = Utc::now();
        Medicine {
            id: generate_row_id(),
            medicine_id: medicine_id.to_string(),
            name: format!("Medicine {medicine_id}"),
            group_name: Some("Analgesics".to_string()),
            supplier: None,
            stock,
            buy_price_cents: Some(40),
            sell_price_cents: 100,
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.medicines();

        repo.insert(&medicine("M1", 5)).await.unwrap();

        let found = repo.get_by_medicine_id("M1").await.unwrap().unwrap();
        assert_eq!(found.stock, 5);
        assert_eq!(found.buy_price_cents, Some(40));

        assert!(repo.get_by_medicine_id("GHOST").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_medicine_id_rejected() {
        let db = test_db().await;
        let repo = db.medicines();

        repo.insert(&medicine("M1", 5)).await.unwrap();
        let err = repo.insert(&medicine("M1", 9)).await.unwrap_err();
        assert!(err.violates_unique("medicine_id"));
    }

    #[tokio::test]
    async fn test_update_stock_guarded() {
        let db = test_db().await;
        let repo = db.medicines();

        repo.insert(&medicine("M1", 5)).await.unwrap();

        repo.update_stock("M1", 3).await.unwrap();
        assert_eq!(
            repo.get_by_medicine_id("M1").await.unwrap().unwrap().stock,
            8
        );

        // A delta that would go negative affects no rows
        assert!(repo.update_stock("M1", -9).await.is_err());
        assert_eq!(
            repo.get_by_medicine_id("M1").await.unwrap().unwrap().stock,
            8
        );
    }

    #[tokio::test]
    async fn test_set_prices() {
        let db = test_db().await;
        let repo = db.medicines();

        repo.insert(&medicine("M1", 5)).await.unwrap();
        repo.set_prices("M1", Some(55), 120).await.unwrap();

        let found = repo.get_by_medicine_id("M1").await.unwrap().unwrap();
        assert_eq!(found.buy_price_cents, Some(55));
        assert_eq!(found.sell_price_cents, 120);

        assert!(repo.set_prices("GHOST", None, 10).await.is_err());
    }
}
