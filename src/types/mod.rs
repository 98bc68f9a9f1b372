//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `record`: flat order records and identifiers
//! - `view`: aggregated user/order/product views and response envelopes
//! - `error`: error types for ingestion and search

pub mod error;
pub mod record;
pub mod view;

pub use error::{LineError, OrderError, RepositoryError};
pub use record::{OrderId, OrderRecord, ProductId, RecordKey, UserId};
pub use view::{OrderView, Pagination, ProductView, SearchResponse, UploadSummary, UserView};
