//! Core business logic module
//!
//! This module contains the ingestion and query components:
//! - `aggregation` - flat records into nested user/order/product views
//! - `batch_writer` - waved, bounded-concurrency batch persistence
//! - `query` - search parameter validation, filter building, pagination

pub mod aggregation;
pub mod batch_writer;
pub mod query;

pub use aggregation::group_and_sum;
pub use batch_writer::{BatchConfig, BatchWriter, WriteSummary};
pub use query::{build_query, paginate, OrderQuery, ALLOWED_PARAMETERS, DEFAULT_PAGE_SIZE};
