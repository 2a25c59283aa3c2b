//! # Invoice Numbering Policy
//!
//! Pure derivation of the human-readable invoice number. Stated separately
//! because it is easy to get wrong.
//!
//! ## Format
//! `INV-{YYYY}{MM}-{NNNN}` where `NNNN = archive count + 1`, zero-padded to
//! four digits. Example: `INV-202608-0042`.
//!
//! ## What This Is NOT
//! The sequence component is derived from a count-at-call-time, not from a
//! reserved counter document. Two sales committing in the same instant can
//! compute the same sequence, so the generated number is a *display*
//! convenience and must never be treated as an ordering or uniqueness
//! guarantee on its own. The storage-level UNIQUE constraint on
//! `invoice_number` is the actual correctness backstop; on a collision the
//! sale processor retries with a bumped sequence (the `attempt` parameter)
//! rather than treating the collision as fatal.

use chrono::{DateTime, Datelike, Utc};

/// Prefix of every generated invoice number.
pub const INVOICE_NUMBER_PREFIX: &str = "INV";

/// Derives a display invoice number from the current date and the number of
/// invoices already in the archive.
///
/// ## Arguments
/// * `at` - The moment of the sale (determines the year/month bucket)
/// * `existing_count` - Invoices already persisted, counted at call time
/// * `attempt` - Zero on the first try; bumped on each collision retry so a
///   regenerated number cannot collide with the same neighbor again
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use medipos_core::numbering::derive_invoice_number;
///
/// let at = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
/// assert_eq!(derive_invoice_number(at, 0, 0), "INV-202608-0001");
/// assert_eq!(derive_invoice_number(at, 41, 0), "INV-202608-0042");
/// ```
pub fn derive_invoice_number(at: DateTime<Utc>, existing_count: i64, attempt: u32) -> String {
    let sequence = existing_count + 1 + i64::from(attempt);
    format!(
        "{}-{:04}{:02}-{:04}",
        INVOICE_NUMBER_PREFIX,
        at.year(),
        at.month(),
        sequence
    )
}

/// Checks whether a string looks like a generated invoice number.
///
/// Used by tests and diagnostics only; caller-supplied numbers are accepted
/// in any format.
pub fn matches_invoice_number_format(number: &str) -> bool {
    let mut parts = number.splitn(3, '-');
    let (Some(prefix), Some(bucket), Some(sequence)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == INVOICE_NUMBER_PREFIX
        && bucket.len() == 6
        && bucket.chars().all(|c| c.is_ascii_digit())
        && sequence.len() >= 4
        && sequence.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Unit Tests
// =============================================================================
