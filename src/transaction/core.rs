//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::Error;

/// Alias for the integer type used for transaction IDs in the database.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// A sale of a product as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, assigned in insertion order.
    pub id: TransactionId,
    /// The name of the product.
    pub title: Option<String>,
    /// A longer description of the product.
    pub description: Option<String>,
    /// The price the product was listed at.
    pub price: Option<f64>,
    /// When the sale happened, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// The product category, e.g. "electronics".
    pub category: Option<String>,
    /// Whether the product was sold.
    pub sold: Option<bool>,
}

/// A transaction that has not been stored yet, e.g. one item of the seed data.
///
/// Every field except `dateOfSale` may be missing or `null` in JSON. Fields
/// that are not part of the model are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// The name of the product.
    pub title: Option<String>,
    /// A longer description of the product.
    pub description: Option<String>,
    /// The price the product was listed at.
    pub price: Option<f64>,
    /// When the sale happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// The product category.
    pub category: Option<String>,
    /// Whether the product was sold.
    pub sold: Option<bool>,
}

impl NewTransaction {
    /// Create a transaction for a sale on `date_of_sale` with every other field empty.
    pub fn new(date_of_sale: OffsetDateTime) -> Self {
        Self {
            title: None,
            description: None,
            price: None,
            date_of_sale,
            category: None,
            sold: None,
        }
    }

    /// Set the title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_owned());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the price.
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// The sale month is stored alongside the sale date so that the month filter
/// does not need to parse dates.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                description TEXT,
                price REAL,
                date_of_sale TEXT NOT NULL,
                sale_month INTEGER NOT NULL CHECK (sale_month BETWEEN 1 AND 12),
                category TEXT,
                sold INTEGER
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_sale_month ON \"transaction\"(sale_month);",
        (),
    )?;

    Ok(())
}

/// Insert `transactions` into the database, in order.
///
/// Sale dates are converted to UTC before they are stored.
///
/// Returns the number of transactions inserted.
///
/// # Errors
/// Returns [Error::SqlError] if any insert fails. Rows inserted before the
/// failure are kept unless the caller rolls back its SQL transaction.
pub fn create_transactions(
    transactions: &[NewTransaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let mut statement = connection.prepare(
        "INSERT INTO \"transaction\" (title, description, price, date_of_sale, sale_month, category, sold)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    for transaction in transactions {
        let date_of_sale = transaction.date_of_sale.to_offset(UtcOffset::UTC);

        statement.execute((
            &transaction.title,
            &transaction.description,
            transaction.price,
            date_of_sale,
            u8::from(date_of_sale.month()),
            &transaction.category,
            transaction.sold,
        ))?;
    }

    Ok(transactions.len())
}

/// Delete every transaction and insert `transactions` in their place.
///
/// Both steps run in one SQL transaction, so readers see either the old or the
/// new set of transactions and a failure leaves the old set in place.
///
/// Returns the number of transactions inserted.
///
/// # Errors
/// Returns [Error::SqlError] if the delete, an insert or the commit fails.
pub fn replace_all_transactions(
    transactions: &[NewTransaction],
    connection: &mut Connection,
) -> Result<usize, Error> {
    let sql_transaction = connection.transaction()?;

    let deleted = sql_transaction.execute("DELETE FROM \"transaction\"", ())?;
    let inserted = create_transactions(transactions, &sql_transaction)?;

    sql_transaction.commit()?;

    tracing::debug!("Replaced {deleted} transactions with {inserted} transactions.");

    Ok(inserted)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
///
/// Expects the columns `id, title, description, price, date_of_sale, category, sold`.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        date_of_sale: row.get(4)?,
        category: row.get(5)?,
        sold: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
