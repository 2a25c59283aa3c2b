//! # medipos-core: Pure Business Logic for MediPOS
//!
//! This crate is the **heart** of the pharmacy sale workflow. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       MediPOS Architecture                              │
//! │                                                                         │
//! │  Desktop shell / web handler                                            │
//! │       │  "create-invoice" action                                        │
//! │       ▼                                                                 │
//! │  medipos-api (contract: DTOs, error codes)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ★ medipos-core (THIS CRATE) ★                                         │
//! │    types • numbering • validation • errors                              │
//! │    NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  medipos-db (SaleProcessor transaction, repositories, SQLite)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Medicine, Invoice, Customer, cart input)
//! - [`numbering`] - Invoice number derivation policy
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod numbering;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use medipos_core::Invoice` instead of
// `use medipos_core::types::Invoice`

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fallback operator identity stamped on invoices when the caller does not
/// supply `created_by`.
pub const DEFAULT_CREATED_BY: &str = "admin";

/// Maximum line items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Bound on invoice-number regeneration attempts after a uniqueness
/// collision. The derived sequence is a display hint; the storage-level
/// UNIQUE constraint is the real guarantee, so a handful of retries with a
/// bumped sequence is enough.
pub const MAX_NUMBERING_ATTEMPTS: u32 = 3;
