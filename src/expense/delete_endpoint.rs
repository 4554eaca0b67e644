use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, database_id::ExpenseId, endpoints,
    expense::core::delete_expense, flash::set_flash,
};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense, redirects to the expenses page.
///
/// Responds with the 404 page if there is no expense with `expense_id`.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    jar: PrivateCookieJar,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        Ok(0) => {
            tracing::debug!("tried to delete missing expense {expense_id}");
            Error::DeleteMissingExpense.into_response()
        }
        Ok(_) => {
            tracing::info!("deleted expense {expense_id}");
            let jar = set_flash(jar, &Alert::success("Expense deleted."));
            (jar, Redirect::to(endpoints::ROOT)).into_response()
        }
        Err(error) => {
            tracing::error!("could not delete expense {expense_id}: {error}");
            error.into_response()
        }
    }
}
