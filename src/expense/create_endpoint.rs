//! Defines the endpoint for adding a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    expense::{
        core::{Expense, NewExpense, create_expense},
        date::parse_date,
    },
    flash::set_flash,
    timezone::current_local_date,
};

/// The state needed to add an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The categories a new expense may use.
    pub categories: Arc<[String]>,
    /// Whether the category must be one of [CreateExpenseState::categories].
    pub enforce_categories: bool,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            categories: state.categories.clone(),
            enforce_categories: state.enforce_categories,
        }
    }
}

/// The form data for adding an expense.
///
/// The fields are kept as text so that missing and malformed values can be
/// reported with a friendly message instead of a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseForm {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub date: String,
}

/// Check the form and turn it into an expense ready to be saved.
///
/// A date that cannot be parsed is replaced with `today`. If `categories` is
/// given, the category must be one of them.
///
/// # Errors
/// Returns:
/// - [Error::MissingFields] if any field is blank,
/// - [Error::InvalidAmount] if the amount is not a finite number greater than zero,
/// - [Error::InvalidCategory] if the category is not in `categories`.
pub(crate) fn validate_expense_form(
    form: &ExpenseForm,
    today: Date,
    categories: Option<&[String]>,
) -> Result<NewExpense, Error> {
    let description = form.description.trim();
    let amount = form.amount.trim();
    let category = form.category.trim();
    let date = form.date.trim();

    if description.is_empty() || amount.is_empty() || category.is_empty() || date.is_empty() {
        return Err(Error::MissingFields);
    }

    let amount = match amount.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => amount,
        _ => return Err(Error::InvalidAmount),
    };

    if let Some(categories) = categories {
        if !categories.iter().any(|allowed| allowed == category) {
            return Err(Error::InvalidCategory(categories.join(", ")));
        }
    }

    let date = parse_date(date).unwrap_or(today);

    Ok(Expense::build(description, amount, category, date))
}

/// A route handler for adding a new expense, redirects to the expenses page
/// with a message saying whether it worked.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let today = match current_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let categories = state.enforce_categories.then_some(&*state.categories);

    let new_expense = match validate_expense_form(&form, today, categories) {
        Ok(new_expense) => new_expense,
        Err(error) => {
            tracing::debug!("rejected expense form {form:?}: {error}");
            return redirect_with_flash(jar, error.into_alert());
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_expense(new_expense, &connection) {
        Ok(expense) => {
            tracing::info!("created expense {}", expense.id);
            redirect_with_flash(jar, Alert::success("Expense added successfully!"))
        }
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            error.into_response()
        }
    }
}

fn redirect_with_flash(jar: PrivateCookieJar, alert: Alert) -> Response {
    (set_flash(jar, &alert), Redirect::to(endpoints::ROOT)).into_response()
}
