//! Repository abstraction for order persistence
//!
//! The core never talks to a storage backend directly; it consumes the
//! [`OrderRepository`] trait and receives typed [`RepositoryError`]
//! variants instead of inspecting backend-specific error shapes. The
//! connection object behind an implementation is constructed once at
//! process start and injected; there is no global singleton handle.
//!
//! A document-store-backed implementation lives outside this crate; the
//! in-memory implementation in [`memory`] backs the CLI and the test
//! suite.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{OrderId, OrderRecord, RepositoryError, UserId};

pub mod memory;

pub use memory::InMemoryOrderRepository;

/// Name of the uniqueness index superseded by the full-tuple index
///
/// Dropped (tolerating absence) before the first batch of every upload
/// run.
pub const SUPERSEDED_UNIQUE_INDEX: &str = "user_id_1_order_id_1_product_id_1";

/// Storage-agnostic record filter
///
/// All present conditions apply conjunctively; the date range applies
/// unconditionally even when `order_id` or `user_id` is also set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Match records of this order only
    pub order_id: Option<OrderId>,
    /// Match records of this user only
    pub user_id: Option<UserId>,
    /// Inclusive date range; always normalized so start <= end
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl OrderFilter {
    /// Whether a record satisfies every present condition
    pub fn matches(&self, record: &OrderRecord) -> bool {
        if self.order_id.is_some_and(|id| id != record.order_id) {
            return false;
        }
        if self.user_id.is_some_and(|id| id != record.user_id) {
            return false;
        }
        if let Some((start, end)) = self.date_range {
            if record.date < start || record.date > end {
                return false;
            }
        }
        true
    }
}

/// Pagination window applied by `find`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Records to skip before the page starts
    pub skip: u64,
    /// Maximum records to return
    pub limit: u64,
}

/// Persistence operations consumed by the core
///
/// Implementations must be safe to share across the batch writer's
/// concurrent tasks. Timeouts and connection-pool limits are the
/// implementation's responsibility, not the core's.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a batch of records
    ///
    /// With `ordered: false` a rejected record must not block the rest of
    /// the batch from being attempted. Returns the number of records
    /// accepted; duplicate rejections surface as
    /// [`RepositoryError::DuplicateKey`] carrying the partial insert
    /// count.
    async fn insert_many(
        &self,
        records: &[OrderRecord],
        ordered: bool,
    ) -> Result<usize, RepositoryError>;

    /// Fetch records matching the filter, in insertion order
    ///
    /// `window: None` returns every match (used by `all=true` searches).
    async fn find(
        &self,
        filter: &OrderFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<OrderRecord>, RepositoryError>;

    /// Count records matching the filter
    async fn count(&self, filter: &OrderFilter) -> Result<u64, RepositoryError>;

    /// Drop the named index
    ///
    /// Returns [`RepositoryError::IndexNotFound`] when the index does not
    /// exist; callers decide whether that is tolerable.
    async fn drop_index(&self, name: &str) -> Result<(), RepositoryError>;

    /// Verify the backend is reachable
    ///
    /// Called once at process start; a failure is fatal and the process
    /// must not begin accepting work.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn record(user_id: u64, order_id: u64, date: &str) -> OrderRecord {
        OrderRecord {
            user_id,
            name: format!("User {}", user_id),
            order_id,
            product_id: 1,
            product_value: Decimal::from_str("10.00").unwrap(),
            date: NaiveDate::from_str(date).unwrap(),
        }
    }

    fn range(start: &str, end: &str) -> Option<(NaiveDate, NaiveDate)> {
        Some((
            NaiveDate::from_str(start).unwrap(),
            NaiveDate::from_str(end).unwrap(),
        ))
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = OrderFilter::default();
        assert!(filter.matches(&record(1, 1, "2021-03-08")));
    }

    #[rstest]
    #[case::order_id_match(OrderFilter { order_id: Some(5), ..Default::default() }, 1, 5, true)]
    #[case::order_id_mismatch(OrderFilter { order_id: Some(5), ..Default::default() }, 1, 6, false)]
    #[case::user_id_match(OrderFilter { user_id: Some(1), ..Default::default() }, 1, 5, true)]
    #[case::user_id_mismatch(OrderFilter { user_id: Some(2), ..Default::default() }, 1, 5, false)]
    fn test_id_conditions(
        #[case] filter: OrderFilter,
        #[case] user_id: u64,
        #[case] order_id: u64,
        #[case] expected: bool,
    ) {
        assert_eq!(filter.matches(&record(user_id, order_id, "2021-03-08")), expected);
    }

    #[rstest]
    #[case::inside("2021-03-08", true)]
    #[case::on_start("2021-03-01", true)]
    #[case::on_end("2021-03-31", true)]
    #[case::before("2021-02-28", false)]
    #[case::after("2021-04-01", false)]
    fn test_date_range_is_inclusive(#[case] date: &str, #[case] expected: bool) {
        let filter = OrderFilter {
            date_range: range("2021-03-01", "2021-03-31"),
            ..Default::default()
        };
        assert_eq!(filter.matches(&record(1, 1, date)), expected);
    }

    #[test]
    fn test_date_range_applies_alongside_id_conditions() {
        let filter = OrderFilter {
            user_id: Some(1),
            date_range: range("2021-03-01", "2021-03-31"),
            ..Default::default()
        };

        assert!(filter.matches(&record(1, 1, "2021-03-08")));
        assert!(!filter.matches(&record(1, 1, "2021-04-08")));
        assert!(!filter.matches(&record(2, 1, "2021-03-08")));
    }
}
