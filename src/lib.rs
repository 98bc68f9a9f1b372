//! Sales Order Engine Library
//! # Overview
//!
//! This library ingests flat fixed-width text files describing sales
//! orders, persists the individual (user, order, product) rows with
//! duplicate tolerance, and serves aggregated, paginated views of those
//! rows grouped by user and order.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (records, aggregated views, errors)
//! - [`cli`] - CLI argument parsing
//! - [`io`] - Fixed-width upload file format handling
//! - [`core`] - Business logic components:
//!   - [`core::aggregation`] - flat records into nested user/order/product views
//!   - [`core::batch_writer`] - waved, bounded-concurrency batch persistence
//!   - [`core::query`] - search validation, filter building, pagination
//! - [`repository`] - Persistence abstraction plus the in-memory implementation
//! - [`usecase`] - Upload and search entry points
//!
//! # Ingestion Flow
//!
//! File bytes are parsed line by line (invalid lines are skipped, never
//! fatal), written to the repository in fixed-size batches with bounded
//! concurrency (duplicate-key rejections count as skipped), and the
//! response summary carries the aggregation of everything that parsed.
//!
//! # Search Flow
//!
//! Query parameters are validated against a closed allow-list, turned
//! into a storage-agnostic filter, counted and fetched with a pagination
//! window, and aggregated into the response envelope.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod repository;
pub mod types;
pub mod usecase;

pub use crate::core::{build_query, group_and_sum, paginate, BatchConfig, BatchWriter, WriteSummary};
pub use io::{encode_line, parse_content, parse_line};
pub use repository::{InMemoryOrderRepository, OrderFilter, OrderRepository, PageWindow};
pub use types::{
    LineError, OrderError, OrderRecord, RepositoryError, SearchResponse, UploadSummary, UserView,
};
pub use usecase::{SearchOrders, UploadOrders};
