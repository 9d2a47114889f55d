//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, db::initialize, month::MonthPolicy, pagination::PaginationConfig, seed::SeedSource,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Where to fetch the seed data from.
    pub seed_source: SeedSource,

    /// The config that controls how to page through transactions.
    pub pagination_config: PaginationConfig,

    /// Whether requests must name a month.
    pub month_policy: MonthPolicy,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        seed_source: SeedSource,
        pagination_config: PaginationConfig,
        month_policy: MonthPolicy,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            seed_source,
            pagination_config,
            month_policy,
        })
    }
}
