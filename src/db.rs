//! Sets up the application database.

use rusqlite::Connection;

use crate::{Error, expense::create_expense_table};

/// Create the tables for the app's domain models.
///
/// This function is idempotent, so it is safe to call on a database that has
/// already been initialised.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_expense_table(connection)?;

    Ok(())
}
