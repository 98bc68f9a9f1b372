//! Aggregated view and response types
//!
//! These types are computed per request by the aggregation engine and
//! discarded after the response is produced; they are never persisted.
//! Field names inside the aggregated tree stay snake_case to match the
//! wire format of the original API, while the top-level response
//! envelopes use camelCase.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::record::{OrderId, ProductId, UserId};

/// One product occurrence inside an order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    /// Product identifier
    pub product_id: ProductId,
    /// Product value in canonical two-decimal form
    pub value: Decimal,
}

/// One order with its computed total and product list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    /// Order identifier
    pub order_id: OrderId,
    /// Sum of all product values in this order, rounded half-up to
    /// exactly two decimals
    pub total: Decimal,
    /// Purchase date taken from the first record seen for this order
    pub date: NaiveDate,
    /// Products in input order
    pub products: Vec<ProductView>,
}

/// One user with their orders in first-seen order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    /// User identifier
    pub user_id: UserId,
    /// User name taken from the first record seen for this user
    pub name: String,
    /// Orders in first-seen order
    pub orders: Vec<OrderView>,
}

/// Response summary returned by the upload entry point
///
/// `data` is built from all successfully parsed records, not only the
/// successfully saved ones; a re-upload of an already ingested file
/// reports zero saved orders but still returns the full aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    /// Human-readable outcome message
    pub message: String,
    /// Name of the uploaded file
    pub file_name: String,
    /// Uploaded payload size in bytes
    pub file_size: usize,
    /// Number of non-blank lines processed
    pub lines: usize,
    /// Records accepted by the storage layer
    pub saved_orders: usize,
    /// Records rejected as duplicates or lost to batch failures
    pub skipped_orders: usize,
    /// Aggregated view of every parsed record
    pub data: Vec<UserView>,
}

/// Pagination metadata for the search envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of pages, never less than 1
    pub total_pages: u64,
    /// The page this response covers
    pub current_page: u64,
    /// Total records matching the filter
    pub total_items: u64,
    /// Effective page size for this response
    pub items_per_page: u64,
}

/// Envelope returned by the search entry point
///
/// Both paginated and `all=true` searches use this single shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    /// Pagination metadata
    pub pagination: Pagination,
    /// Aggregated view of the records on this page
    pub data: Vec<UserView>,
}
