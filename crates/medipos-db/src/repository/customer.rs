//! # Customer Repository
//!
//! Database operations for the customer directory.
//!
//! The directory is keyed by phone for the sale processor's upsert: a sale
//! that carries both a customer name and phone creates the record if absent,
//! or overwrites the name if present (last-write-wins, no merge).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::generate_row_id;
use medipos_core::Customer;

const CUSTOMER_COLUMNS: &str = "id, phone, name, email, address, created_at, updated_at";

/// Repository for customer directory operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Finds a customer by phone number.
    pub async fn find_by_phone(&self, phone: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE phone = ?1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Creates or updates a customer keyed by phone.
    ///
    /// ## Semantics
    /// - No record with that phone: a new one is created
    /// - Record exists: `name` is overwritten with the supplied value;
    ///   email and address are left untouched
    pub async fn upsert_by_phone(&self, phone: &str, name: &str) -> DbResult<()> {
        debug!(phone = %phone, "Upserting customer");

        let now = Utc::now();

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
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts directory entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
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

    #[tokio::test]
    async fn test_upsert_creates_then_overwrites_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.upsert_by_phone("0300-1234567", "Ayesha Khan")
            .await
            .unwrap();
        let first = repo
            .find_by_phone("0300-1234567")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.name, "Ayesha Khan");

        repo.upsert_by_phone("0300-1234567", "A. Khan").await.unwrap();
        let second = repo
            .find_by_phone("0300-1234567")
            .await
            .unwrap()
            .unwrap();

        // Same row, new name
        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "A. Khan");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_phone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db
            .customers()
            .find_by_phone("0000")
            .await
            .unwrap()
            .is_none());
    }
}
