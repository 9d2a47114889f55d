//! Set up and tear down the application's database.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    transaction::{create_transaction_table, register_search_functions},
};

/// Register the app's SQL functions and create the tables for the domain models
/// if they do not exist yet.
///
/// Must be called on every connection before it is queried.
///
/// # Errors
/// Returns an error if a function cannot be registered or a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    register_search_functions(connection)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Close the shared database connection.
///
/// This should be called once the server has stopped. If other handles to the
/// connection are still alive, the connection is left open and will be closed
/// when the last handle is dropped.
///
/// # Errors
/// Returns an error if the connection lock is poisoned or SQLite fails to
/// close the connection.
pub fn close(db_connection: Arc<Mutex<Connection>>) -> Result<(), Error> {
    let connection = match Arc::try_unwrap(db_connection) {
        Ok(connection) => connection,
        Err(shared) => {
            tracing::warn!(
                "database connection still has {} other handles, it will be closed when they are dropped",
                Arc::strong_count(&shared) - 1
            );
            return Ok(());
        }
    };

    let connection = connection
        .into_inner()
        .map_err(|_| Error::DatabaseLockError)?;

    connection.close().map_err(|(_, error)| Error::from(error))?;

    tracing::info!("Closed database connection.");

    Ok(())
}
