//! Counting transactions by price range for the bar chart.

use serde::Serialize;

use crate::transaction::Transaction;

/// The inclusive upper bound and label of each price range, in ascending order.
///
/// Prices above the last bound fall into [OPEN_RANGE_LABEL].
const PRICE_RANGES: [(f64, &str); 9] = [
    (100.0, "0-100"),
    (200.0, "101-200"),
    (300.0, "201-300"),
    (400.0, "301-400"),
    (500.0, "401-500"),
    (600.0, "501-600"),
    (700.0, "601-700"),
    (800.0, "701-800"),
    (900.0, "801-900"),
];

const OPEN_RANGE_LABEL: &str = "901-above";

/// The number of transactions in one price range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRangeCount {
    /// The label of the price range, e.g. "101-200".
    pub range: &'static str,
    /// The number of transactions in the price range.
    pub count: u64,
}

/// Get the index of the price range that `price` falls into.
///
/// The first range whose upper bound is at least `price` wins, so 100 goes in
/// "0-100" and 100.5 in "101-200".
fn price_range_index(price: f64) -> usize {
    PRICE_RANGES
        .iter()
        .position(|&(upper_bound, _)| price <= upper_bound)
        .unwrap_or(PRICE_RANGES.len())
}

/// Count the transactions in each of the ten price ranges.
///
/// Always returns ten ranges in ascending order, including empty ones.
/// A missing price counts as zero.
pub(super) fn count_by_price_range(transactions: &[Transaction]) -> Vec<PriceRangeCount> {
    let mut counts = [0u64; PRICE_RANGES.len() + 1];

    for transaction in transactions {
        counts[price_range_index(transaction.price.unwrap_or(0.0))] += 1;
    }

    PRICE_RANGES
        .iter()
        .map(|&(_, label)| label)
        .chain(std::iter::once(OPEN_RANGE_LABEL))
        .zip(counts)
        .map(|(range, count)| PriceRangeCount { range, count })
        .collect()
}
