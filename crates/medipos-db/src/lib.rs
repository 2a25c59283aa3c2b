//! # medipos-db: Database Layer for MediPOS
//!
//! This crate provides database access for the pharmacy backend.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MediPOS Data Flow                                │
//! │                                                                         │
//! │  "create-invoice" action (medipos-api)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     medipos-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐  ┌──────────────┐  ┌──────────────────────┐ │   │
//! │  │   │   Database   │  │ Repositories │  │    SaleProcessor     │ │   │
//! │  │   │  (pool.rs)   │  │ medicine     │  │  the one place where │ │   │
//! │  │   │  SqlitePool  │◄─│ invoice      │  │  multiple records    │ │   │
//! │  │   │  Migrations  │  │ customer     │  │  change together     │ │   │
//! │  │   └──────────────┘  └──────────────┘  └──────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, foreign keys on)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (medicine, invoice, customer)
//! - [`sale`] - The transactional sale processor
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medipos_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/medipos.db")).await?;
//! let created = db.sales().create_invoice(&input).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sale;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use sale::{SaleError, SaleProcessor};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::medicine::MedicineRepository;
