//! Search parameter validation, filter building, and pagination
//!
//! Validates raw query parameters against a closed allow-list, builds
//! the storage-agnostic [`OrderFilter`], and computes pagination
//! windows. Stateless: every call is independent.

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;

use crate::repository::{OrderFilter, PageWindow};
use crate::types::{OrderError, Pagination};

/// The closed allow-list of query parameter names
pub const ALLOWED_PARAMETERS: &[&str] = &["order_id", "user_id", "start", "end", "page", "all"];

/// Page size used unless `all=true`
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Validated search query: filter plus pagination inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Storage-agnostic record filter
    pub filter: OrderFilter,
    /// Requested page, already defaulted to 1
    pub page: u64,
    /// Whether the caller asked for everything in one page
    pub all: bool,
}

/// Build a validated query from raw string parameters
///
/// # Rules
///
/// - Any key outside [`ALLOWED_PARAMETERS`] is a hard error naming the
///   offending key(s).
/// - `order_id`/`user_id` must be digit-only strings.
/// - A lone `start` gets `end` defaulted to the current UTC date; a lone
///   `end` gets `start` defaulted to the minimum representable date.
///   Dates must match strict `YYYY-MM-DD`; a reversed range is silently
///   swapped, never rejected.
/// - `page` defaults to 1 when absent, non-numeric, or non-positive.
/// - `all` is true only for the exact value `"true"`.
pub fn build_query(params: &HashMap<String, String>) -> Result<OrderQuery, OrderError> {
    build_query_with_today(params, Utc::now().date_naive())
}

/// [`build_query`] with an explicit "today", so the `end` default is
/// testable without depending on the wall clock
pub fn build_query_with_today(
    params: &HashMap<String, String>,
    today: NaiveDate,
) -> Result<OrderQuery, OrderError> {
    let unknown: Vec<&String> = params
        .keys()
        .filter(|key| !ALLOWED_PARAMETERS.contains(&key.as_str()))
        .collect();
    if !unknown.is_empty() {
        return Err(OrderError::unknown_parameters(&unknown));
    }

    let order_id = parse_id_parameter(params.get("order_id"), "order_id")?;
    let user_id = parse_id_parameter(params.get("user_id"), "user_id")?;

    let date_range = match (params.get("start"), params.get("end")) {
        (None, None) => None,
        (start, end) => {
            let mut start_date = match start {
                Some(value) => parse_strict_date(value)?,
                None => NaiveDate::MIN,
            };
            let mut end_date = match end {
                Some(value) => parse_strict_date(value)?,
                None => today,
            };
            if start_date > end_date {
                std::mem::swap(&mut start_date, &mut end_date);
            }
            Some((start_date, end_date))
        }
    };

    let page = params
        .get("page")
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1);

    let all = params.get("all").is_some_and(|value| value == "true");

    Ok(OrderQuery {
        filter: OrderFilter {
            order_id,
            user_id,
            date_range,
        },
        page,
        all,
    })
}

/// Parse an id parameter as a digit-only non-negative integer
fn parse_id_parameter(
    value: Option<&String>,
    name: &'static str,
) -> Result<Option<u64>, OrderError> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(OrderError::InvalidIdParameter { name });
    }
    value
        .parse::<u64>()
        .map(Some)
        .map_err(|_| OrderError::InvalidIdParameter { name })
}

/// Parse a strict `YYYY-MM-DD` date
///
/// The shape check is explicit because the chrono parser alone would
/// also accept unpadded components like `2024-1-1`.
fn parse_strict_date(value: &str) -> Result<NaiveDate, OrderError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, byte)| match i {
                4 | 7 => *byte == b'-',
                _ => byte.is_ascii_digit(),
            });
    if !well_formed {
        return Err(OrderError::InvalidDateParameter {
            value: value.to_string(),
        });
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| OrderError::InvalidDateParameter {
        value: value.to_string(),
    })
}

/// Compute the pagination window and metadata for a query
///
/// With `all: true` the whole result set is one page: no window is
/// applied and the page size equals the total item count. Otherwise the
/// window is `skip = (page - 1) * 100, limit = 100` and
/// `totalPages = max(1, ceil(totalItems / 100))`. The current page is
/// reported as requested, even past the last page.
pub fn paginate(total_items: u64, page: u64, all: bool) -> (Option<PageWindow>, Pagination) {
    if all {
        return (
            None,
            Pagination {
                total_pages: 1,
                current_page: 1,
                total_items,
                items_per_page: total_items,
            },
        );
    }

    let window = PageWindow {
        skip: (page - 1) * DEFAULT_PAGE_SIZE,
        limit: DEFAULT_PAGE_SIZE,
    };
    let pagination = Pagination {
        total_pages: total_items.div_ceil(DEFAULT_PAGE_SIZE).max(1),
        current_page: page,
        total_items,
        items_per_page: DEFAULT_PAGE_SIZE,
    };

    (Some(window), pagination)
}
