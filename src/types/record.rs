//! Order record types for the sales order engine
//!
//! This module defines the flat order record produced by the fixed-width
//! line parser, one record per (user, order, product) file line, along with
//! the natural key used by the storage layer to enforce uniqueness.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// User identifier parsed from the first fixed-width column
pub type UserId = u64;

/// Order identifier
pub type OrderId = u64;

/// Product identifier
pub type ProductId = u64;

/// Flat order record, one per input file line
///
/// Records are immutable once created: they are only ever inserted,
/// never updated. The full six-field tuple forms the storage uniqueness
/// key, so re-uploading the same file produces duplicate-key rejections
/// that the ingestion path tolerates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// The user this row belongs to
    pub user_id: UserId,

    /// User name, trimmed of the fixed-width padding (max 45 characters)
    pub name: String,

    /// The order this product row belongs to
    pub order_id: OrderId,

    /// The product sold on this row
    pub product_id: ProductId,

    /// Product value in canonical two-decimal form
    ///
    /// Always carries scale 2, so it serializes to its textual
    /// two-decimal representation (e.g. `"1836.74"`).
    pub product_value: Decimal,

    /// Purchase date (serialized as `YYYY-MM-DD`)
    pub date: NaiveDate,
}

impl OrderRecord {
    /// The natural key that the storage layer keeps unique
    ///
    /// Covers every field of the record; two records are duplicates only
    /// when all six fields match.
    pub fn natural_key(&self) -> RecordKey {
        RecordKey {
            user_id: self.user_id,
            name: self.name.clone(),
            order_id: self.order_id,
            product_id: self.product_id,
            product_value: self.product_value,
            date: self.date,
        }
    }
}

/// Owned uniqueness key over the full record tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// User identifier component
    pub user_id: UserId,
    /// User name component
    pub name: String,
    /// Order identifier component
    pub order_id: OrderId,
    /// Product identifier component
    pub product_id: ProductId,
    /// Product value component
    pub product_value: Decimal,
    /// Purchase date component
    pub date: NaiveDate,
}
