//! Aggregation engine
//!
//! Transforms a flat sequence of order records into the nested
//! user -> order -> product view with computed per-order totals. The
//! function is pure, does no I/O, and is deterministic for a given
//! input sequence.
//!
//! # Grouping
//!
//! Grouping is hashed: slot indices into the output vectors are kept in
//! `HashMap`s, so the pass stays O(n) instead of re-scanning each user's
//! order list per record. Output order for users and for orders within a
//! user is first-seen input order; products are appended in input order.
//!
//! # Totals
//!
//! Order totals are exact `Decimal` sums of the product values, rounded
//! half-up (midpoint away from zero) to exactly two decimals at the end
//! of the pass. Summing `10.555` and `20.444` therefore yields `31.00`,
//! never a float-drifted neighbour.

use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::types::{OrderId, OrderRecord, OrderView, ProductView, UserId, UserView};

/// Group records by user and order, computing per-order totals
///
/// The user's `name` and each order's `date` come from the first record
/// seen for that user or order. An empty input yields an empty vector.
pub fn group_and_sum(records: &[OrderRecord]) -> Vec<UserView> {
    let mut users: Vec<UserView> = Vec::new();
    let mut user_slots: HashMap<UserId, usize> = HashMap::new();
    let mut order_slots: HashMap<(UserId, OrderId), usize> = HashMap::new();

    for record in records {
        let user_slot = *user_slots.entry(record.user_id).or_insert_with(|| {
            users.push(UserView {
                user_id: record.user_id,
                name: record.name.clone(),
                orders: Vec::new(),
            });
            users.len() - 1
        });

        let order_slot = *order_slots
            .entry((record.user_id, record.order_id))
            .or_insert_with(|| {
                let orders = &mut users[user_slot].orders;
                orders.push(OrderView {
                    order_id: record.order_id,
                    total: Decimal::ZERO,
                    date: record.date,
                    products: Vec::new(),
                });
                orders.len() - 1
            });

        let order = &mut users[user_slot].orders[order_slot];
        order.products.push(ProductView {
            product_id: record.product_id,
            value: record.product_value,
        });
        order.total += record.product_value;
    }

    for user in &mut users {
        for order in &mut user.orders {
            let mut total = order
                .total
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            total.rescale(2);
            order.total = total;
        }
    }

    users
}
