//! In-memory order repository
//!
//! Reference implementation of [`OrderRepository`] backing the CLI and
//! the test suite. Records live in an insertion-ordered log behind an
//! `RwLock`; the natural-key uniqueness constraint and the index
//! catalogue are `DashSet`s so concurrent batch tasks can insert without
//! blocking each other on the key check.
//!
//! The implementation reports partial results on duplicate rejection:
//! with unordered semantics every non-duplicate record in the batch is
//! still written and counted.

use dashmap::DashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{OrderFilter, OrderRepository, PageWindow, SUPERSEDED_UNIQUE_INDEX};
use crate::types::{OrderRecord, RecordKey, RepositoryError};

/// Name of the active full-tuple uniqueness index
pub const UNIQUE_ALL_FIELDS_INDEX: &str = "unique_all_fields";

/// Thread-safe in-memory record store
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    /// Insertion-ordered record log
    records: RwLock<Vec<OrderRecord>>,
    /// Natural keys of every stored record
    keys: DashSet<RecordKey>,
    /// Index catalogue, seeded like a store that predates the
    /// full-tuple index migration
    indexes: DashSet<String>,
}

impl InMemoryOrderRepository {
    /// Create an empty repository
    ///
    /// The index catalogue starts with both the superseded per-id index
    /// and the active full-tuple index, so the first upload run of a
    /// process exercises the drop path and later runs exercise the
    /// not-found tolerance.
    pub fn new() -> Self {
        let indexes = DashSet::new();
        indexes.insert(SUPERSEDED_UNIQUE_INDEX.to_string());
        indexes.insert(UNIQUE_ALL_FIELDS_INDEX.to_string());

        Self {
            records: RwLock::new(Vec::new()),
            keys: DashSet::new(),
            indexes,
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<OrderRecord>>, RepositoryError> {
        self.records.write().map_err(|_| RepositoryError::Other {
            message: "record store lock poisoned".to_string(),
        })
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert_many(
        &self,
        records: &[OrderRecord],
        ordered: bool,
    ) -> Result<usize, RepositoryError> {
        let attempted = records.len();
        let mut store = self.store()?;

        let mut inserted = 0;
        let mut rejected = false;
        for record in records {
            if self.keys.insert(record.natural_key()) {
                store.push(record.clone());
                inserted += 1;
            } else {
                rejected = true;
                // Ordered semantics stop at the first rejection.
                if ordered {
                    break;
                }
            }
        }

        if rejected {
            Err(RepositoryError::DuplicateKey {
                inserted,
                attempted,
            })
        } else {
            Ok(inserted)
        }
    }

    async fn find(
        &self,
        filter: &OrderFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<OrderRecord>, RepositoryError> {
        let records = self.records.read().map_err(|_| RepositoryError::Other {
            message: "record store lock poisoned".to_string(),
        })?;

        let matching = records.iter().filter(|record| filter.matches(record));
        let page = match window {
            Some(window) => matching
                .skip(usize::try_from(window.skip).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };

        Ok(page)
    }

    async fn count(&self, filter: &OrderFilter) -> Result<u64, RepositoryError> {
        let records = self.records.read().map_err(|_| RepositoryError::Other {
            message: "record store lock poisoned".to_string(),
        })?;

        Ok(records.iter().filter(|record| filter.matches(record)).count() as u64)
    }

    async fn drop_index(&self, name: &str) -> Result<(), RepositoryError> {
        if self.indexes.remove(name).is_some() {
            Ok(())
        } else {
            Err(RepositoryError::IndexNotFound {
                name: name.to_string(),
            })
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn record(user_id: u64, order_id: u64, product_id: u64) -> OrderRecord {
        OrderRecord {
            user_id,
            name: format!("User {}", user_id),
            order_id,
            product_id,
            product_value: Decimal::from_str("10.00").unwrap(),
            date: NaiveDate::from_ymd_opt(2021, 3, 8).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_many_accepts_new_records() {
        let repository = InMemoryOrderRepository::new();
        let records = vec![record(1, 1, 1), record(1, 1, 2), record(2, 3, 1)];

        let inserted = repository.insert_many(&records, false).await.unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(repository.len(), 3);
    }

    #[tokio::test]
    async fn test_unordered_insert_reports_partial_result_on_duplicates() {
        let repository = InMemoryOrderRepository::new();
        repository
            .insert_many(&[record(1, 1, 1)], false)
            .await
            .unwrap();

        // One duplicate in the middle must not block the records after it.
        let batch = vec![record(1, 1, 2), record(1, 1, 1), record(1, 1, 3)];
        let result = repository.insert_many(&batch, false).await;

        assert_eq!(
            result,
            Err(RepositoryError::DuplicateKey {
                inserted: 2,
                attempted: 3,
            })
        );
        assert_eq!(repository.len(), 3);
    }

    #[tokio::test]
    async fn test_ordered_insert_stops_at_first_duplicate() {
        let repository = InMemoryOrderRepository::new();
        repository
            .insert_many(&[record(1, 1, 1)], false)
            .await
            .unwrap();

        let batch = vec![record(1, 1, 2), record(1, 1, 1), record(1, 1, 3)];
        let result = repository.insert_many(&batch, true).await;

        assert_eq!(
            result,
            Err(RepositoryError::DuplicateKey {
                inserted: 1,
                attempted: 3,
            })
        );
        assert_eq!(repository.len(), 2);
    }

    #[tokio::test]
    async fn test_find_preserves_insertion_order() {
        let repository = InMemoryOrderRepository::new();
        let records = vec![record(2, 5, 1), record(1, 1, 1), record(2, 5, 2)];
        repository.insert_many(&records, false).await.unwrap();

        let found = repository
            .find(&OrderFilter::default(), None)
            .await
            .unwrap();

        assert_eq!(found, records);
    }

    #[tokio::test]
    async fn test_find_applies_filter_and_window() {
        let repository = InMemoryOrderRepository::new();
        let records: Vec<OrderRecord> = (1..=5).map(|i| record(1, 1, i)).collect();
        repository.insert_many(&records, false).await.unwrap();
        repository
            .insert_many(&[record(2, 2, 1)], false)
            .await
            .unwrap();

        let filter = OrderFilter {
            user_id: Some(1),
            ..Default::default()
        };
        let window = Some(PageWindow { skip: 2, limit: 2 });
        let found = repository.find(&filter, window).await.unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].product_id, 3);
        assert_eq!(found[1].product_id, 4);
    }

    #[tokio::test]
    async fn test_count_applies_filter() {
        let repository = InMemoryOrderRepository::new();
        let records = vec![record(1, 1, 1), record(1, 2, 1), record(2, 3, 1)];
        repository.insert_many(&records, false).await.unwrap();

        let filter = OrderFilter {
            user_id: Some(1),
            ..Default::default()
        };
        assert_eq!(repository.count(&filter).await.unwrap(), 2);
        assert_eq!(repository.count(&OrderFilter::default()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_drop_index_succeeds_once_then_reports_not_found() {
        let repository = InMemoryOrderRepository::new();

        assert!(repository.drop_index(SUPERSEDED_UNIQUE_INDEX).await.is_ok());

        let result = repository.drop_index(SUPERSEDED_UNIQUE_INDEX).await;
        assert_eq!(
            result,
            Err(RepositoryError::IndexNotFound {
                name: SUPERSEDED_UNIQUE_INDEX.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_ping_reports_reachable() {
        let repository = InMemoryOrderRepository::new();
        assert!(repository.ping().await.is_ok());
    }
}
