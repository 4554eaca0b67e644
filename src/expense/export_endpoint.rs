//! CSV export of the expenses matching a filter.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use csv::{Terminator, WriterBuilder};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{
        core::Expense,
        filter::{ExpenseFilter, FilterQuery},
        query::{ExpenseOrder, get_expenses},
    },
};

const CSV_HEADER: [&str; 5] = ["ID", "Date", "Description", "Category", "Amount"];

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportExpensesState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Download the expenses matching the filter in the query string as a CSV file.
///
/// Unlike the expenses page, the date range is not checked: dates that cannot
/// be parsed are ignored and an inverted range simply matches nothing.
pub async fn export_expenses_endpoint(
    State(state): State<ExportExpensesState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let filter = ExpenseFilter::from_query(&query.trimmed());

    let expenses = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_expenses(&filter, ExpenseOrder::DateDescending, &connection)
            .inspect_err(|error| tracing::error!("could not get expenses for export: {error}"))?
    };

    let csv = write_expenses_csv(&expenses)
        .inspect_err(|error| tracing::error!("could not write expenses as CSV: {error}"))?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=expenses.csv"),
        ],
        csv,
    )
        .into_response())
}

/// Write `expenses` as CSV with a header row, dates as `YYYY-MM-DD` and
/// amounts with two decimal places.
///
/// # Errors
/// Returns [Error::CsvError] if the CSV cannot be written.
pub(crate) fn write_expenses_csv(expenses: &[Expense]) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for expense in expenses {
        writer.write_record([
            expense.id.to_string(),
            expense.date.to_string(),
            expense.description.clone(),
            expense.category.clone(),
            format!("{:.2}", expense.amount),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        expense::{Expense, create_expense, filter::FilterQuery},
        test_utils::{assert_content_type, assert_status_ok, get_header},
    };

    use super::{ExportExpensesState, export_expenses_endpoint, write_expenses_csv};

    fn get_test_state() -> ExportExpensesState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        for (description, amount, category, date) in [
            ("Groceries", 54.2, "Food", date!(2024 - 01 - 05)),
            ("Bus fare", 3.5, "Transport", date!(2024 - 01 - 10)),
            ("Rent", 800.0, "Rent", date!(2024 - 01 - 01)),
            ("Takeaways", 12.0, "Food", date!(2024 - 02 - 02)),
            ("Fish, chips", 9.999, "Food", date!(2024 - 01 - 20)),
        ] {
            create_expense(
                Expense::build(description, amount, category, date),
                &connection,
            )
            .unwrap();
        }

        ExportExpensesState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    async fn export(query: FilterQuery) -> (axum::response::Response, Vec<csv::StringRecord>) {
        let response = export_expenses_endpoint(State(get_test_state()), Query(query))
            .await
            .unwrap();
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let records = csv::Reader::from_reader(body.as_ref())
            .records()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        (axum::response::Response::from_parts(parts, axum::body::Body::empty()), records)
    }

    #[test]
    fn writes_header_and_rows() {
        let expenses = [Expense {
            id: 3,
            description: "Fish, \"chips\"".to_owned(),
            amount: 12.0,
            category: "Food".to_owned(),
            date: date!(2024 - 01 - 05),
        }];

        let csv = write_expenses_csv(&expenses).unwrap();

        assert_eq!(
            csv,
            "ID,Date,Description,Category,Amount\r\n\
             3,2024-01-05,\"Fish, \"\"chips\"\"\",Food,12.00\r\n"
        );
    }

    #[test]
    fn empty_export_has_header_only() {
        assert_eq!(
            write_expenses_csv(&[]).unwrap(),
            "ID,Date,Description,Category,Amount\r\n"
        );
    }

    #[tokio::test]
    async fn responds_with_attachment() {
        let (response, _) = export(FilterQuery::default()).await;

        assert_status_ok(&response);
        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=expenses.csv"
        );
    }

    #[tokio::test]
    async fn exports_filtered_category() {
        let (_, records) = export(FilterQuery {
            category: "Food".to_owned(),
            ..Default::default()
        })
        .await;

        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(&record[3], "Food", "{record:?}");

            let amount = &record[4];
            let decimals = amount.split_once('.').map(|(_, decimals)| decimals.len());
            assert_eq!(decimals, Some(2), "want 2 decimal places, got {amount:?}");
        }
    }

    #[tokio::test]
    async fn exports_newest_first() {
        let (_, records) = export(FilterQuery::default()).await;

        let dates: Vec<&str> = records.iter().map(|record| &record[1]).collect();
        assert_eq!(
            dates,
            ["2024-02-02", "2024-01-20", "2024-01-10", "2024-01-05", "2024-01-01"]
        );
        assert_eq!(&records[1][4], "10.00");
    }

    #[tokio::test]
    async fn inverted_range_is_not_an_error() {
        let (response, records) = export(FilterQuery {
            start: "2024-02-01".to_owned(),
            end: "2024-01-01".to_owned(),
            category: String::new(),
        })
        .await;

        assert_status_ok(&response);
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn bad_dates_are_ignored() {
        let (_, records) = export(FilterQuery {
            start: "yesterday".to_owned(),
            end: "2024-13-01".to_owned(),
            category: String::new(),
        })
        .await;

        assert_eq!(records.len(), 5);
    }
}
