//! # medipos-api: Action Contract for MediPOS
//!
//! The single message/action contract through which shells reach the sale
//! processor.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Desktop shell (IPC)            Web shell (HTTP handler)                │
//! │        │                               │                                │
//! │        └──────────────┬────────────────┘                                │
//! │                       │  ("create-invoice", JSON payload)               │
//! │                       ▼                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   medipos-api (THIS CRATE)                      │   │
//! │  │   actions::dispatch ── DTOs ── ApiError { code, message }       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │  medipos-db::SaleProcessor (one transactional unit of work)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`actions`] - Action dispatch and the `create-invoice` handler
//! - [`dto`] - camelCase wire types (exported to TypeScript via ts-rs)
//! - [`error`] - `ApiError` with machine-readable codes

pub mod actions;
pub mod dto;
pub mod error;

pub use actions::{create_invoice, dispatch, CREATE_INVOICE};
pub use dto::{ActionResponse, CreateInvoiceRequest, InvoiceDto};
pub use error::{ApiError, ErrorCode};
