//! The expenses page: lists the filtered expenses along with their totals.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{
        aggregation::get_aggregates,
        filter::{ExpenseFilter, FilterQuery},
        query::{ExpenseOrder, get_expenses},
        view::{ExpensesPageData, expenses_view},
    },
    flash::take_flash,
    timezone::current_local_date,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The categories offered in the add expense and filter forms.
    pub categories: Arc<[String]>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            categories: state.categories.clone(),
        }
    }
}

/// The filter to apply to the page, after validation.
#[derive(Debug, PartialEq)]
struct ResolvedFilter {
    /// The filter fields to show in the filter form.
    query: FilterQuery,
    filter: ExpenseFilter,
    /// Set if the filter had to be changed.
    error: Option<Error>,
}

/// Trim the filter fields and check the date range.
///
/// An end date before the start date drops both dates, including the text
/// shown in the filter form, and keeps the category.
fn resolve_filter(query: FilterQuery) -> ResolvedFilter {
    let query = query.trimmed();
    let filter = ExpenseFilter::from_query(&query);

    match (filter.start, filter.end) {
        (Some(start), Some(end)) if end < start => {
            tracing::debug!("ignoring inverted date range {start} to {end}");

            ResolvedFilter {
                filter: ExpenseFilter {
                    start: None,
                    end: None,
                    ..filter
                },
                query: FilterQuery {
                    start: String::new(),
                    end: String::new(),
                    ..query
                },
                error: Some(Error::InvalidDateRange),
            }
        }
        _ => ResolvedFilter {
            query,
            filter,
            error: None,
        },
    }
}

/// Display the expenses matching the filter in the query string, with their
/// totals and charts, and the forms for adding and filtering expenses.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    jar: PrivateCookieJar,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let resolved = resolve_filter(query);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_expenses(&resolved.filter, ExpenseOrder::Newest, &connection)
        .inspect_err(|error| tracing::error!("could not get expenses: {error}"))?;
    let aggregates = get_aggregates(&resolved.filter, &expenses, &connection)
        .inspect_err(|error| tracing::error!("could not get expense totals: {error}"))?;
    drop(connection);

    let (jar, flash) = take_flash(jar);
    let alerts = flash
        .into_iter()
        .chain(resolved.error.map(Error::into_alert))
        .collect();

    let page = expenses_view(ExpensesPageData {
        alerts,
        categories: &state.categories,
        today,
        filter_query: &resolved.query,
        expenses: &expenses,
        aggregates: &aggregates,
    });

    Ok((jar, page).into_response())
}
