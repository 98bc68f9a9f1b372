//! Fixed-width line format handling
//!
//! Decodes one 95-character line of the upload format into an
//! [`OrderRecord`], and re-encodes records back to the same layout for
//! tests and fixture generation.
//!
//! # Layout
//!
//! ```text
//! user_id        [ 0..10]  right-aligned, zero-padded integer
//! name           [10..55]  right-aligned, space-padded text
//! order_id       [55..65]  right-aligned, zero-padded integer
//! product_id     [65..75]  right-aligned, zero-padded integer
//! product_value  [75..87]  right-aligned decimal text
//! date           [87..95]  YYYYMMDD, reformatted to YYYY-MM-DD
//! ```
//!
//! # Error Handling
//!
//! Parse failures are local to the line. [`parse_content`] skips blank
//! lines silently, logs invalid lines at `warn`, and never aborts the
//! file.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::types::{LineError, OrderRecord};

/// Total width of one record line in characters
pub const LINE_WIDTH: usize = 95;

/// Width of the name column
const NAME_WIDTH: usize = 45;

/// Width of the product value column
const VALUE_WIDTH: usize = 12;

/// Result of parsing a whole file body
///
/// `lines` counts every non-blank line (valid or invalid); blank lines
/// never increment it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    /// Successfully parsed records in input order
    pub records: Vec<OrderRecord>,
    /// Non-blank lines processed
    pub lines: usize,
    /// Non-blank lines rejected by the parser
    pub invalid_lines: usize,
}

/// Extract a trimmed column from the character buffer
fn column(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end.min(chars.len())]
        .iter()
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse an id column as an unsigned integer
fn parse_id(chars: &[char], start: usize, end: usize, field: &'static str) -> Result<u64, LineError> {
    let value = column(chars, start, end);
    value
        .parse::<u64>()
        .map_err(|_| LineError::InvalidNumber { field, value })
}

/// Parse the product value column into canonical two-decimal form
///
/// Rejects negative values; rounds half-up (midpoint away from zero) to
/// two decimals and fixes the scale so the textual form always carries
/// exactly two decimal places.
fn parse_value(raw: String) -> Result<Decimal, LineError> {
    let value = Decimal::from_str(&raw).map_err(|_| LineError::InvalidValue { value: raw.clone() })?;
    if value.is_sign_negative() {
        return Err(LineError::InvalidValue { value: raw });
    }
    let mut canonical = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    canonical.rescale(2);
    Ok(canonical)
}

/// Parse one fixed-width line into an [`OrderRecord`]
///
/// # Arguments
///
/// * `line` - One line of the upload file, without the trailing newline
///
/// # Returns
///
/// * `Ok(OrderRecord)` if every column decodes at its documented offset
/// * `Err(LineError)` describing the first offending column
///
/// # Examples
///
/// ```
/// use sales_order_engine::io::parse_line;
///
/// let line = "0000000070                              Palmer Prosacco00000007530000000003     1836.7420210308";
/// let record = parse_line(line).unwrap();
/// assert_eq!(record.user_id, 70);
/// assert_eq!(record.name, "Palmer Prosacco");
/// assert_eq!(record.product_value.to_string(), "1836.74");
/// ```
pub fn parse_line(line: &str) -> Result<OrderRecord, LineError> {
    let chars: Vec<char> = line.trim_end_matches(['\r', '\n']).chars().collect();
    if chars.len() < LINE_WIDTH {
        return Err(LineError::TooShort {
            length: chars.len(),
            expected: LINE_WIDTH,
        });
    }

    let user_id = parse_id(&chars, 0, 10, "user_id")?;
    let name = column(&chars, 10, 55);
    let order_id = parse_id(&chars, 55, 65, "order_id")?;
    let product_id = parse_id(&chars, 65, 75, "product_id")?;
    let product_value = parse_value(column(&chars, 75, 87))?;

    let raw_date = column(&chars, 87, 95);
    let date = NaiveDate::parse_from_str(&raw_date, "%Y%m%d")
        .map_err(|_| LineError::InvalidDate { value: raw_date })?;

    Ok(OrderRecord {
        user_id,
        name,
        order_id,
        product_id,
        product_value,
        date,
    })
}

/// Re-encode a record to the fixed-width layout
///
/// Inverse of [`parse_line`] up to column padding: parsing the encoded
/// line yields the original record.
pub fn encode_line(record: &OrderRecord) -> String {
    format!(
        "{:0>10}{:>name_width$}{:0>10}{:0>10}{:>value_width$}{}",
        record.user_id,
        record.name,
        record.order_id,
        record.product_id,
        record.product_value,
        record.date.format("%Y%m%d"),
        name_width = NAME_WIDTH,
        value_width = VALUE_WIDTH,
    )
}

/// Parse a whole file body, recovering from per-line failures
///
/// Blank and whitespace-only lines are skipped without incrementing the
/// processed-line counter. Invalid lines are counted, logged at `warn`
/// with their one-based line number, and skipped; parsing always reaches
/// the end of the file.
pub fn parse_content(content: &str) -> ParsedFile {
    let mut parsed = ParsedFile::default();

    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        parsed.lines += 1;

        match parse_line(line) {
            Ok(record) => parsed.records.push(record),
            Err(error) => {
                parsed.invalid_lines += 1;
                tracing::warn!(line = number + 1, %error, "skipping invalid line");
            }
        }
    }

    parsed
}
