//! Platform fee policy.
//!
//! Donations are recorded at face value and no fee is ever deducted. The
//! rates below are policy constants, not derived state: keeping them as
//! literals makes the zero-fee guarantee explicit and tamper-evident.

use crate::transactions::TransactionCategory;

/// Platform fee rate, percent. Always zero.
pub const PLATFORM_FEE_RATE: f64 = 0.0;

/// Payment processing fee rate, percent. Always zero.
pub const PROCESSING_FEE_RATE: f64 = 0.0;

/// Share of every donation that reaches its campaign, percent.
pub const DONATION_EFFICIENCY: f64 = 100.0;

/// Categories that may appear in public transparency projections.
///
/// The projector filters against this set on every read. A fee-like
/// category must never leak into a public listing, even if a row with one
/// somehow ends up in storage.
pub const PUBLIC_CATEGORIES: [TransactionCategory; 3] = [
    TransactionCategory::Donation,
    TransactionCategory::Disbursement,
    TransactionCategory::Refund,
];

/// Returns `true` if the category is publicly listable.
pub fn is_public_category(category: TransactionCategory) -> bool {
    PUBLIC_CATEGORIES.contains(&category)
}
