//! Defines the route handler for listing transactions a page at a time.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    month::{MonthPolicy, resolve_month_filter},
    pagination::{Page, PaginationConfig},
};

use super::{
    core::Transaction,
    query::{TransactionFilter, get_transactions_page},
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The page defaults for requests that do not specify them.
    pub pagination_config: PaginationConfig,
    /// Whether requests must name a month.
    pub month_policy: MonthPolicy,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config,
            month_policy: state.month_policy,
        }
    }
}

/// The query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// The one-based page number.
    pub page: Option<u64>,
    /// The maximum number of transactions per page.
    pub per_page: Option<u64>,
    /// Text to look for in the title, description or category.
    pub search: Option<String>,
    /// The English name of the month the transactions were sold in.
    pub month: Option<String>,
}

/// One page of transactions.
#[derive(Debug, Serialize)]
pub struct TransactionsPage {
    /// The transactions on the page, in insertion order.
    pub transactions: Vec<Transaction>,
}

/// A route handler for listing the transactions that match the month and
/// search text, one page at a time.
///
/// The month and page parameters are validated before the database is queried.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionsState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<TransactionsPage>, Error> {
    let month = resolve_month_filter(query.month.as_deref(), state.month_policy)?;
    let page = Page::from_params(query.page, query.per_page, state.pagination_config)?;
    let filter = TransactionFilter {
        month,
        search: query.search.as_deref(),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_page(filter, page, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(Json(TransactionsPage { transactions }))
}
