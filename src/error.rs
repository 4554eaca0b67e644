//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::response::{IntoResponse, Response};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more of the fields for a new expense was empty.
    #[error("Please fill all fields.")]
    MissingFields,

    /// The amount for a new expense was not a number, or was zero or negative.
    #[error("Amount must be a positive number.")]
    InvalidAmount,

    /// The category for a new expense is not one of the configured categories.
    ///
    /// Only returned when category enforcement is turned on.
    #[error("Category must be one of: {0}.")]
    InvalidCategory(String),

    /// The end date of a filter comes before its start date.
    #[error("End date cannot be before start date.")]
    InvalidDateRange,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The CSV export could not be written.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl Error {
    /// Whether the error was caused by invalid user input rather than a fault
    /// in the server.
    pub(crate) fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::MissingFields
                | Error::InvalidAmount
                | Error::InvalidCategory(_)
                | Error::InvalidDateRange
        )
    }

    /// Convert the error into an alert that can be shown to the user.
    ///
    /// Validation errors use their message as is. Any other error gets a
    /// generic message since the details are only intended for the server logs.
    pub(crate) fn into_alert(self) -> Alert {
        if self.is_validation_error() {
            Alert::error(self.to_string())
        } else {
            Alert::error("Something went wrong. Check the server logs for more details.")
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError::default().into_response(),
            Error::DeleteMissingExpense => NotFoundError {
                description: "Expense not found",
                fix: "The expense may have already been deleted. Go back to the \
                    homepage to see your expenses.",
            }
            .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
