//! Database query helpers for listing and exporting expenses.

use rusqlite::{Connection, params_from_iter};

use crate::Error;

use super::{
    core::{EXPENSE_COLUMNS, Expense, map_expense_row},
    filter::ExpenseFilter,
};

/// The order to return expenses in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpenseOrder {
    /// Latest date first, and the most recently added first within a day.
    Newest,
    /// Latest date first, with no particular order within a day.
    DateDescending,
}

impl ExpenseOrder {
    fn order_clause(self) -> &'static str {
        match self {
            ExpenseOrder::Newest => "ORDER BY date DESC, id DESC",
            ExpenseOrder::DateDescending => "ORDER BY date DESC",
        }
    }
}

/// Get the expenses matching `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Expense row mapping fails
pub(crate) fn get_expenses(
    filter: &ExpenseFilter,
    order: ExpenseOrder,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let where_clause = filter.where_clause();
    let query = format!(
        "SELECT {EXPENSE_COLUMNS} FROM expense {} {}",
        where_clause.sql,
        order.order_clause()
    );

    let expenses = connection
        .prepare(&query)?
        .query_map(params_from_iter(where_clause.params.iter()), map_expense_row)?
        .map(|expense_result| expense_result.map_err(Error::SqlError))
        .collect::<Result<Vec<_>, _>>()?;

    debug_assert!(expenses.iter().all(|expense| filter.matches(expense)));

    Ok(expenses)
}
