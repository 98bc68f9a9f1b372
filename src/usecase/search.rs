//! Search entry point
//!
//! Validates query parameters, counts and fetches matching records
//! through the repository, and returns the aggregated, paginated
//! envelope. Both paginated and `all=true` searches share the single
//! envelope shape.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{build_query, group_and_sum, paginate};
use crate::repository::OrderRepository;
use crate::types::{OrderError, SearchResponse};

/// Search use case over an [`OrderRepository`]
#[derive(Clone)]
pub struct SearchOrders {
    repository: Arc<dyn OrderRepository>,
}

impl SearchOrders {
    /// Create the search use case
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    /// Execute a search over raw query parameters
    ///
    /// # Errors
    ///
    /// * Validation errors from the filter builder (unknown keys, bad
    ///   ids, malformed dates); never retried
    /// * [`OrderError::Repository`] when the storage layer fails to
    ///   count or fetch
    pub async fn execute(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<SearchResponse, OrderError> {
        let query = build_query(params)?;

        let total_items = self.repository.count(&query.filter).await?;
        let (window, pagination) = paginate(total_items, query.page, query.all);

        let records = self.repository.find(&query.filter, window).await?;
        let data = group_and_sum(&records);

        tracing::debug!(
            total_items,
            page = pagination.current_page,
            returned = records.len(),
            "search executed"
        );

        Ok(SearchResponse { pagination, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryOrderRepository;
    use crate::types::OrderRecord;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn record(user_id: u64, order_id: u64, product_id: u64, date: &str) -> OrderRecord {
        OrderRecord {
            user_id,
            name: format!("User {}", user_id),
            order_id,
            product_id,
            product_value: Decimal::from_str("10.00").unwrap(),
            date: NaiveDate::from_str(date).unwrap(),
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    async fn seeded_search(records: Vec<OrderRecord>) -> SearchOrders {
        let repository = Arc::new(InMemoryOrderRepository::new());
        repository.insert_many(&records, false).await.unwrap();
        SearchOrders::new(repository)
    }

    #[tokio::test]
    async fn test_unfiltered_search_returns_everything_aggregated() {
        let search = seeded_search(vec![
            record(1, 10, 1, "2021-03-08"),
            record(1, 10, 2, "2021-03-08"),
            record(2, 20, 3, "2021-05-01"),
        ])
        .await;

        let response = search.execute(&params(&[])).await.unwrap();

        assert_eq!(response.pagination.total_items, 3);
        assert_eq!(response.pagination.total_pages, 1);
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].orders[0].total.to_string(), "20.00");
    }

    #[tokio::test]
    async fn test_user_filter_narrows_results() {
        let search = seeded_search(vec![
            record(1, 10, 1, "2021-03-08"),
            record(2, 20, 2, "2021-03-08"),
        ])
        .await;

        let response = search.execute(&params(&[("user_id", "2")])).await.unwrap();

        assert_eq!(response.pagination.total_items, 1);
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].user_id, 2);
    }

    #[tokio::test]
    async fn test_date_range_applies_with_id_filter() {
        let search = seeded_search(vec![
            record(1, 10, 1, "2021-03-08"),
            record(1, 11, 2, "2021-06-20"),
        ])
        .await;

        let response = search
            .execute(&params(&[
                ("user_id", "1"),
                ("start", "2021-06-01"),
                ("end", "2021-06-30"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.pagination.total_items, 1);
        assert_eq!(response.data[0].orders[0].order_id, 11);
    }

    #[tokio::test]
    async fn test_pages_window_the_flat_records() {
        // 150 distinct records across two users: 100 then 50.
        let mut records = Vec::new();
        for product_id in 1..=100 {
            records.push(record(1, 10, product_id, "2021-03-08"));
        }
        for product_id in 1..=50 {
            records.push(record(2, 20, product_id, "2021-03-08"));
        }
        let search = seeded_search(records).await;

        let first = search.execute(&params(&[("page", "1")])).await.unwrap();
        assert_eq!(first.pagination.total_pages, 2);
        assert_eq!(first.data.len(), 1);
        assert_eq!(first.data[0].user_id, 1);
        assert_eq!(first.data[0].orders[0].products.len(), 100);

        let second = search.execute(&params(&[("page", "2")])).await.unwrap();
        assert_eq!(second.pagination.current_page, 2);
        assert_eq!(second.data.len(), 1);
        assert_eq!(second.data[0].user_id, 2);
        assert_eq!(second.data[0].orders[0].products.len(), 50);
    }

    #[tokio::test]
    async fn test_all_true_returns_single_page_envelope() {
        let records: Vec<OrderRecord> = (1..=120)
            .map(|product_id| record(1, 10, product_id, "2021-03-08"))
            .collect();
        let search = seeded_search(records).await;

        let response = search.execute(&params(&[("all", "true")])).await.unwrap();

        assert_eq!(response.pagination.total_pages, 1);
        assert_eq!(response.pagination.current_page, 1);
        assert_eq!(response.pagination.items_per_page, 120);
        assert_eq!(response.data[0].orders[0].products.len(), 120);
    }

    #[tokio::test]
    async fn test_validation_errors_pass_through() {
        let search = seeded_search(vec![]).await;

        let result = search.execute(&params(&[("foo", "bar")])).await;
        assert!(matches!(result, Err(OrderError::UnknownParameters { .. })));

        let result = search.execute(&params(&[("user_id", "abc")])).await;
        assert!(matches!(
            result,
            Err(OrderError::InvalidIdParameter { name: "user_id" })
        ));
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_single_page() {
        let search = seeded_search(vec![]).await;

        let response = search.execute(&params(&[])).await.unwrap();

        assert_eq!(response.pagination.total_items, 0);
        assert_eq!(response.pagination.total_pages, 1);
        assert!(response.data.is_empty());
    }
}
