//! Counting transactions by category for the pie chart.

use rusqlite::Connection;
use serde::Serialize;

use crate::Error;

/// The number of transactions in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// The category, or `None` for transactions without one.
    #[serde(rename = "_id")]
    pub category: Option<String>,
    /// The number of transactions in the category.
    pub count: u64,
}

/// Count the transactions in each category for `month`, or across all months
/// if `month` is `None`.
///
/// Transactions without a category are counted as their own group. Groups are
/// sorted by category with the uncategorised group first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(super) fn get_category_counts(
    month: Option<u8>,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    connection
        .prepare(
            "SELECT category, COUNT(*) FROM \"transaction\" \
            WHERE (?1 IS NULL OR sale_month = ?1) \
            GROUP BY category \
            ORDER BY category ASC",
        )?
        .query_map([month], |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
            })
        })?
        .map(|count_result| count_result.map_err(Error::SqlError))
        .collect()
}
