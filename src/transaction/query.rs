//! Database query helpers for listing and filtering transactions.

use rusqlite::{Connection, functions::FunctionFlags};

use crate::{Error, pagination::Page};

use super::core::{Transaction, map_transaction_row};

/// Conditions a transaction must meet to be listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TransactionFilter<'a> {
    /// Only include transactions sold in this month (1-12, UTC).
    pub month: Option<u8>,
    /// Only include transactions whose title, description or category contain
    /// this text, ignoring case.
    pub search: Option<&'a str>,
}

/// Register the SQL functions used by the transaction queries on `connection`.
///
/// `contains_ignoring_case(text, search)` is true when `text` contains
/// `search` after both are lowercased. Unlike `LIKE`, this folds the case of
/// non-ASCII letters and treats `%` and `_` as plain characters. A `NULL`
/// `text` never matches.
///
/// # Errors
/// Returns an error if SQLite rejects the function.
pub(crate) fn register_search_functions(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        "contains_ignoring_case",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text = context.get::<Option<String>>(0)?;
            let search = context.get::<Option<String>>(1)?;

            Ok(match (text, search) {
                (Some(text), Some(search)) => contains_ignoring_case(&text, &search),
                _ => false,
            })
        },
    )
}

fn contains_ignoring_case(text: &str, search: &str) -> bool {
    text.to_lowercase().contains(&search.to_lowercase())
}

/// Get one page of the transactions that match `filter`, in insertion order.
///
/// An empty search text matches every transaction.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub(crate) fn get_transactions_page(
    filter: TransactionFilter,
    page: Page,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let search = filter.search.filter(|search| !search.is_empty());
    let limit = i64::try_from(page.size).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

    connection
        .prepare(
            "SELECT id, title, description, price, date_of_sale, category, sold FROM \"transaction\" \
            WHERE (?1 IS NULL OR sale_month = ?1) \
            AND (?2 IS NULL \
                OR contains_ignoring_case(title, ?2) \
                OR contains_ignoring_case(description, ?2) \
                OR contains_ignoring_case(category, ?2)) \
            ORDER BY id ASC \
            LIMIT ?3 OFFSET ?4",
        )?
        .query_map((filter.month, search, limit, offset), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Get every transaction sold in `month`, or every transaction if `month` is `None`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub(crate) fn get_transactions_in_month(
    month: Option<u8>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, description, price, date_of_sale, category, sold FROM \"transaction\" \
            WHERE (?1 IS NULL OR sale_month = ?1) \
            ORDER BY id ASC",
        )?
        .query_map([month], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}
