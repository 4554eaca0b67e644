//! The filter shared by the list page, its charts and the CSV export.
//!
//! The conditions are written down once in [ExpenseFilter] and every query
//! that selects expenses appends the same `WHERE` clause, so the table, the
//! totals and the export always agree on which expenses match.

use rusqlite::types::Value;
use serde::Deserialize;
use time::Date;

use crate::expense::{core::Expense, date::parse_date};

/// The filter fields as sent by the client.
///
/// Also used to fill the filter form back in and to build the export link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterQuery {
    /// The earliest date to include, as `YYYY-MM-DD`.
    #[serde(default)]
    pub start: String,
    /// The latest date to include, as `YYYY-MM-DD`.
    #[serde(default)]
    pub end: String,
    /// Only include expenses in this category.
    #[serde(default)]
    pub category: String,
}

impl FilterQuery {
    /// Strip leading and trailing whitespace from every field.
    pub fn trimmed(self) -> Self {
        Self {
            start: self.start.trim().to_owned(),
            end: self.end.trim().to_owned(),
            category: self.category.trim().to_owned(),
        }
    }

    /// Encode the non-empty fields as a URL query string, e.g. `category=Food`.
    pub fn to_query_string(&self) -> String {
        let pairs = [
            ("start", &self.start),
            ("end", &self.end),
            ("category", &self.category),
        ];
        let pairs = pairs.iter().filter(|(_, value)| !value.is_empty());

        serde_urlencoded::to_string(pairs.collect::<Vec<_>>())
            .inspect_err(|error| tracing::error!("could not encode filter {self:?}: {error}"))
            .unwrap_or_default()
    }
}

/// Selects expenses by date range and category.
///
/// Each field that is `None` places no constraint on the expenses, so the
/// default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only match expenses on or after this date.
    pub start: Option<Date>,
    /// Only match expenses on or before this date.
    pub end: Option<Date>,
    /// Only match expenses with exactly this category (case-sensitive).
    pub category: Option<String>,
}

/// A SQL `WHERE` clause and the values for its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WhereClause {
    /// Either empty or a clause starting with `WHERE`.
    pub sql: String,
    /// The values for the `?` placeholders in `sql`, in order.
    pub params: Vec<Value>,
}

impl ExpenseFilter {
    /// Create a filter, treating an empty `category` as no category.
    pub fn new(start: Option<Date>, end: Option<Date>, category: &str) -> Self {
        let category = (!category.is_empty()).then(|| category.to_owned());

        Self {
            start,
            end,
            category,
        }
    }

    /// Create a filter from the fields sent by the client.
    ///
    /// Dates that cannot be parsed are treated as absent.
    pub fn from_query(query: &FilterQuery) -> Self {
        Self::new(
            parse_date(&query.start),
            parse_date(&query.end),
            query.category.trim(),
        )
    }

    /// Whether `expense` satisfies every condition in the filter.
    pub fn matches(&self, expense: &Expense) -> bool {
        self.start.is_none_or(|start| expense.date >= start)
            && self.end.is_none_or(|end| expense.date <= end)
            && self
                .category
                .as_ref()
                .is_none_or(|category| &expense.category == category)
    }

    /// Build the `WHERE` clause that selects the same expenses as [ExpenseFilter::matches].
    pub(crate) fn where_clause(&self) -> WhereClause {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(start) = self.start {
            conditions.push("date >= ?");
            params.push(Value::Text(start.to_string()));
        }

        if let Some(end) = self.end {
            conditions.push("date <= ?");
            params.push(Value::Text(end.to_string()));
        }

        if let Some(ref category) = self.category {
            conditions.push("category = ?");
            params.push(Value::Text(category.clone()));
        }

        let sql = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        WhereClause { sql, params }
    }
}
