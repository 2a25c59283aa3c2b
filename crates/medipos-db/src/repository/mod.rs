//! # Repository Module
//!
//! Database repository implementations for MediPOS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Action handler                                                         │
//! │       │  db.medicines().get_by_medicine_id("AMOX-500")                  │
//! │       ▼                                                                 │
//! │  MedicineRepository                                                     │
//! │       │  SQL query                                                      │
//! │       ▼                                                                 │
//! │  SQLite database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold the read paths and the simple single-row writes. The
//! multi-row sale transaction does NOT go through them — it lives in
//! [`crate::sale`], where every statement shares one transaction.
//!
//! ## Available Repositories
//!
//! - [`medicine::MedicineRepository`] - Catalog lookups and stock/price writes
//! - [`invoice::InvoiceRepository`] - Invoice archive reads
//! - [`customer::CustomerRepository`] - Customer directory reads and upsert

pub mod customer;
pub mod invoice;
pub mod medicine;

use uuid::Uuid;

/// Generates a new UUID v4 row ID.
///
/// Business identifiers (medicine_id, invoice_number, phone) are assigned by
/// humans or by the numbering policy; row IDs are always UUIDs.
pub fn generate_row_id() -> String {
    Uuid::new_v4().to_string()
}
