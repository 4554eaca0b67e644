//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{Error, database_id::ExpenseId};

// ============================================================================
// MODELS
// ============================================================================

/// Money spent on something.
///
/// To create a new `Expense`, use [Expense::build] and [create_expense].
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense, assigned by the database.
    pub id: ExpenseId,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent, always greater than zero.
    pub amount: f64,
    /// The category of the expense, e.g. "Food", "Rent".
    pub category: String,
    /// When the money was spent.
    pub date: Date,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [NewExpense] for discoverability.
    pub fn build(description: &str, amount: f64, category: &str, date: Date) -> NewExpense {
        NewExpense {
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
            date,
        }
    }
}

/// The data for an expense that has not been saved to the database yet.
///
/// Validation of user input happens before one of these is created, see the
/// add expense endpoint.
#[derive(Debug, PartialEq, Clone)]
pub struct NewExpense {
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The category of the expense.
    pub category: String,
    /// When the money was spent.
    pub date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns of the expense table in the order [map_expense_row] expects.
pub(crate) const EXPENSE_COLUMNS: &str = "id, description, amount, category, date";

/// Create a new expense in the database.
///
/// The database assigns the ID, which is never reused even after the expense
/// is deleted.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(&format!(
            "INSERT INTO expense (description, amount, category, date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                new_expense.description,
                new_expense.amount,
                new_expense.category,
                new_expense.date,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

pub(crate) type RowsAffected = usize;

/// Permanently delete the expense with `id`.
///
/// Returns the number of rows deleted, which is zero if there is no expense
/// with `id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])
        .map_err(|err| err.into())
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Covers the filters and groupings used by the list page and export.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date_category ON expense(date, category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Expense.
///
/// The row must contain the columns in [EXPENSE_COLUMNS] in that order.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let date = row.get(4)?;

    Ok(Expense {
        id,
        description,
        amount,
        category,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        expense::{Expense, count_expenses, create_expense, delete_expense, get_expense},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let expense = create_expense(
            Expense::build("Lunch", 12.5, "Food", date!(2024 - 03 - 02)),
            &conn,
        )
        .expect("Could not create expense");

        assert_eq!(expense.id, 1);
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.date, date!(2024 - 03 - 02));
    }

    #[test]
    fn get_returns_created_expense() {
        let conn = get_test_connection();
        let want = create_expense(
            Expense::build("Bus", 3.2, "Transport", date!(2024 - 03 - 02)),
            &conn,
        )
        .unwrap();

        let got = get_expense(want.id, &conn);

        assert_eq!(got, Ok(want));
    }

    #[test]
    fn get_missing_expense_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_expense(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let conn = get_test_connection();
        let today = date!(2024 - 03 - 02);
        let first = create_expense(Expense::build("A", 1.0, "Food", today), &conn).unwrap();
        delete_expense(first.id, &conn).unwrap();

        let second = create_expense(Expense::build("B", 1.0, "Food", today), &conn).unwrap();

        assert!(
            second.id > first.id,
            "want id greater than {}, got {}",
            first.id,
            second.id
        );
    }

    #[test]
    fn delete_removes_expense() {
        let conn = get_test_connection();
        let expense = create_expense(
            Expense::build("Rent", 1200.0, "Rent", date!(2024 - 03 - 01)),
            &conn,
        )
        .unwrap();

        let rows_affected = delete_expense(expense.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_expense(expense.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_expense_affects_no_rows() {
        let conn = get_test_connection();

        assert_eq!(delete_expense(42, &conn), Ok(0));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        let want_count = 20;
        for i in 1..=want_count {
            create_expense(Expense::build("", i as f64, "Food", today), &conn)
                .expect("Could not create expense");
        }

        let got_count = count_expenses(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
