//! Replacing the stored transactions with seed data fetched over HTTP.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    transaction::{NewTransaction, replace_all_transactions},
};

/// The default location of the seed data: a JSON array of transactions.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// The message sent to the client after the seed data has been loaded.
const SEED_SUCCESS_MESSAGE: &str = "Database Initialized with Seed Data";

/// Where to fetch the seed data from and the HTTP client to fetch it with.
#[derive(Debug, Clone)]
pub struct SeedSource {
    url: String,
    client: reqwest::Client,
}

impl SeedSource {
    /// Create a seed source that fetches the JSON document at `url`.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// The URL of the seed data.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the seed transactions.
    ///
    /// # Errors
    /// Returns [Error::SeedSource] if the request fails, the server responds with
    /// an error status, or the body is not a JSON array of transactions.
    pub async fn fetch(&self) -> Result<Vec<NewTransaction>, Error> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::SeedSource(error.to_string()))?;

        response
            .json::<Vec<NewTransaction>>()
            .await
            .map_err(|error| Error::SeedSource(error.to_string()))
    }
}

impl Default for SeedSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_URL)
    }
}

/// Fetch the seed data from `source` and replace every stored transaction with it.
///
/// The fetch finishes before the database is touched, so a failed fetch leaves
/// the stored transactions as they were. The replacement itself happens in one
/// SQL transaction.
///
/// Returns the number of transactions loaded.
///
/// # Errors
/// Returns [Error::SeedSource] if the seed data cannot be fetched,
/// [Error::DatabaseLockError] if the database lock cannot be acquired, or
/// [Error::SqlError] if the transactions cannot be replaced.
pub async fn reseed(
    source: &SeedSource,
    db_connection: &Mutex<Connection>,
) -> Result<usize, Error> {
    let transactions = source.fetch().await.inspect_err(|error| {
        tracing::error!("could not fetch seed data from {}: {error}", source.url())
    })?;

    tracing::info!(
        "Fetched {} transactions from {}",
        transactions.len(),
        source.url()
    );

    let mut connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    replace_all_transactions(&transactions, &mut connection)
        .inspect_err(|error| tracing::error!("could not replace transactions: {error}"))
}

/// The state needed for loading the seed data.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for replacing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where to fetch the seed data from.
    pub seed_source: SeedSource,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_source: state.seed_source.clone(),
        }
    }
}

/// A route handler that replaces the stored transactions with the seed data.
///
/// Responds with 201 Created on success.
pub async fn initialize_db_endpoint(State(state): State<SeedState>) -> Response {
    match reseed(&state.seed_source, &state.db_connection).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({ "message": SEED_SUCCESS_MESSAGE })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
