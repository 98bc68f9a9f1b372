//! Use case module
//!
//! One capability-set struct per entry point, each consuming the
//! repository trait by injection:
//! - `upload` - ingest a fixed-width order file
//! - `search` - filtered, paginated aggregated views

pub mod search;
pub mod upload;

pub use search::SearchOrders;
pub use upload::UploadOrders;
