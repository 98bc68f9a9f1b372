//! Benchmark suite for the ingestion hot paths
//!
//! Measures fixed-width line parsing and aggregation using the divan
//! benchmarking framework. Inputs are generated in memory outside the
//! timed section.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use chrono::NaiveDate;
use divan::Bencher;
use rust_decimal::Decimal;
use sales_order_engine::{encode_line, group_and_sum, parse_content, OrderRecord};

fn main() {
    divan::main();
}

/// Generate a fixed-width file body with `rows` records spread over a
/// realistic mix of users, orders, and products
fn generate_content(rows: usize) -> String {
    (0..rows)
        .map(|i| {
            let record = OrderRecord {
                user_id: (i % 50) as u64 + 1,
                name: format!("Benchmark User {}", i % 50 + 1),
                order_id: (i % 500) as u64 + 1,
                product_id: (i % 7) as u64 + 1,
                product_value: Decimal::new(1999 + i as i64 % 90000, 2),
                date: NaiveDate::from_ymd_opt(2021, 3, 8).unwrap(),
            };
            format!("{}\n", encode_line(&record))
        })
        .collect()
}

#[divan::bench(args = [100, 1_000, 100_000])]
fn parse_fixed_width(bencher: Bencher, rows: usize) {
    bencher
        .with_inputs(|| generate_content(rows))
        .bench_values(|content| parse_content(&content));
}

#[divan::bench(args = [100, 1_000, 100_000])]
fn aggregate_records(bencher: Bencher, rows: usize) {
    bencher
        .with_inputs(|| parse_content(&generate_content(rows)).records)
        .bench_values(|records| group_and_sum(&records));
}
