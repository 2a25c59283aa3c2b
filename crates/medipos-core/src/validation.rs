//! # Validation Module
//!
//! Input validation for the sale workflow.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell (TypeScript)                                            │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before the transaction opens)                    │
//! │  ├── Quantities, prices, discount, totals consistency                   │
//! │  └── Pure, deterministic, no I/O                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                           │
//! │  ├── UNIQUE constraints (invoice_number, phone, medicine_id)            │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock availability is deliberately NOT checked here: it depends on catalog
//! state and must be evaluated inside the sale transaction, where the read
//! and the decrement are isolated together.

use crate::error::ValidationError;
use crate::types::{CartLine, CreateInvoiceInput};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an external medicine identifier.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
pub fn validate_medicine_id(medicine_id: &str) -> ValidationResult<()> {
    let medicine_id = medicine_id.trim();

    if medicine_id.is_empty() {
        return Err(ValidationError::Required {
            field: "medicineId".to_string(),
        });
    }

    if medicine_id.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "medicineId".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, samples)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a single cart line.
pub fn validate_cart_line(line: &CartLine) -> ValidationResult<()> {
    validate_medicine_id(&line.medicine_id)?;

    if line.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    validate_quantity(line.quantity)?;
    validate_price_cents(line.unit_price_cents)?;

    Ok(())
}

// =============================================================================
// Sale Input Validation
// =============================================================================

/// Computes the invoice subtotal from the cart lines.
pub fn compute_sub_total_cents(items: &[CartLine]) -> i64 {
    items.iter().map(CartLine::total_price_cents).sum()
}

/// Validates the full `create-invoice` input before the transaction opens.
///
/// ## Checks
/// - Cart size cap and per-line rules
/// - Discount is non-negative and at most the subtotal
/// - Caller-supplied `sub_total_cents` / `total_cents`, when present, match
///   the server-side recomputation. The caller's numbers are never trusted
///   as-is; persisted totals are always the recomputed ones.
///
/// The empty-cart case is NOT handled here — the processor reports it as
/// `CoreError::EmptyCart` so it surfaces as a business rule, not a missing
/// field.
pub fn validate_sale_input(input: &CreateInvoiceInput) -> ValidationResult<()> {
    if input.items.len() > MAX_CART_ITEMS {
        return Err(ValidationError::TooMany {
            field: "items".to_string(),
            max: MAX_CART_ITEMS,
        });
    }

    for line in &input.items {
        validate_cart_line(line)?;
    }

    let sub_total = compute_sub_total_cents(&input.items);

    if input.discount_cents < 0 || input.discount_cents > sub_total {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: sub_total,
        });
    }

    if let Some(supplied) = input.sub_total_cents {
        if supplied != sub_total {
            return Err(ValidationError::TotalsMismatch {
                field: "subTotal".to_string(),
                supplied,
                computed: sub_total,
            });
        }
    }

    let total = sub_total - input.discount_cents;
    if let Some(supplied) = input.total_cents {
        if supplied != total {
            return Err(ValidationError::TotalsMismatch {
                field: "totalAmount".to_string(),
                supplied,
                computed: total,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(medicine_id: &str, quantity: i64, unit_price_cents: i64) -> CartLine {
        CartLine {
            medicine_id: medicine_id.to_string(),
            name: "Paracetamol 500mg".to_string(),
            quantity,
            unit_price_cents,
            instructions: None,
        }
    }

    fn input(items: Vec<CartLine>) -> CreateInvoiceInput {
        CreateInvoiceInput {
            items,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_medicine_id() {
        assert!(validate_medicine_id("M1").is_ok());
        assert!(validate_medicine_id("AMOX-500").is_ok());
        assert!(validate_medicine_id("").is_err());
        assert!(validate_medicine_id("   ").is_err());
        assert!(validate_medicine_id(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_compute_sub_total() {
        let items = vec![line("M1", 2, 100), line("M2", 3, 50)];
        assert_eq!(compute_sub_total_cents(&items), 350);
        assert_eq!(compute_sub_total_cents(&[]), 0);
    }

    #[test]
    fn test_discount_bounds() {
        let mut sale = input(vec![line("M1", 2, 100)]);
        sale.discount_cents = 200;
        assert!(validate_sale_input(&sale).is_ok());

        sale.discount_cents = 201;
        assert!(validate_sale_input(&sale).is_err());

        sale.discount_cents = -1;
        assert!(validate_sale_input(&sale).is_err());
    }

    #[test]
    fn test_totals_mismatch_rejected() {
        let mut sale = input(vec![line("M1", 2, 100)]);
        sale.sub_total_cents = Some(200);
        sale.total_cents = Some(200);
        assert!(validate_sale_input(&sale).is_ok());

        sale.sub_total_cents = Some(999);
        let err = validate_sale_input(&sale).unwrap_err();
        assert!(matches!(err, ValidationError::TotalsMismatch { .. }));

        sale.sub_total_cents = Some(200);
        sale.discount_cents = 50;
        sale.total_cents = Some(200); // should be 150
        assert!(validate_sale_input(&sale).is_err());
    }

    #[test]
    fn test_cart_size_cap() {
        let items = (0..=MAX_CART_ITEMS)
            .map(|i| line(&format!("M{i}"), 1, 10))
            .collect();
        assert!(validate_sale_input(&input(items)).is_err());
    }

    #[test]
    fn test_bad_line_rejected() {
        assert!(validate_sale_input(&input(vec![line("", 1, 10)])).is_err());
        assert!(validate_sale_input(&input(vec![line("M1", 0, 10)])).is_err());
        assert!(validate_sale_input(&input(vec![line("M1", 1, -10)])).is_err());
    }
}
