//! Sales transactions.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `NewTransaction` seed record
//! - Database functions for storing, replacing, and querying transactions
//! - The route handler for listing transactions a page at a time

mod core;
mod list_endpoint;
mod query;

pub use core::{
    NewTransaction, Transaction, count_transactions, create_transaction_table,
    create_transactions, map_transaction_row, replace_all_transactions,
};
pub use list_endpoint::list_transactions_endpoint;
pub(crate) use query::{get_transactions_in_month, register_search_functions};
