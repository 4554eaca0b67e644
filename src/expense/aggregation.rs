//! Totals of filtered expenses, overall, per category and per day.
//!
//! All sums are rounded to cents. The per category and per day sums are
//! computed by the database over the same [ExpenseFilter] as the expense list.

use rusqlite::{Connection, params_from_iter};
use time::Date;

use crate::{
    Error,
    expense::{core::Expense, filter::ExpenseFilter},
};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// The total spent on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTotal {
    pub date: Date,
    pub total: f64,
}

/// The summary figures for the list page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    /// The sum of all matching expenses.
    pub total: f64,
    /// Sums grouped by category, in the order the database groups them.
    pub by_category: Vec<CategoryTotal>,
    /// Sums grouped by date, earliest date first.
    pub by_day: Vec<DayTotal>,
}

/// Round `amount` to two decimal places, with halves rounded away from zero.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// The sum of the amounts of `expenses`, rounded to cents.
///
/// The sum of no expenses is zero.
pub fn total_amount(expenses: &[Expense]) -> f64 {
    round_to_cents(expenses.iter().map(|expense| expense.amount).sum())
}

/// Build the summary for `expenses`, which must be the expenses selected by `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if either grouping query fails.
pub(crate) fn get_aggregates(
    filter: &ExpenseFilter,
    expenses: &[Expense],
    connection: &Connection,
) -> Result<Aggregates, Error> {
    Ok(Aggregates {
        total: total_amount(expenses),
        by_category: get_totals_by_category(filter, connection)?,
        by_day: get_totals_by_day(filter, connection)?,
    })
}

/// Sum the expenses matching `filter` for each category.
///
/// Categories with no matching expenses are left out.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_totals_by_category(
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    let where_clause = filter.where_clause();
    let query = format!(
        "SELECT category, SUM(amount) FROM expense {} GROUP BY category",
        where_clause.sql
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(where_clause.params.iter()), |row| {
            let total: Option<f64> = row.get(1)?;

            Ok(CategoryTotal {
                category: row.get(0)?,
                total: round_to_cents(total.unwrap_or(0.0)),
            })
        })?
        .map(|result| result.map_err(Error::SqlError))
        .collect()
}

/// Sum the expenses matching `filter` for each day, earliest day first.
///
/// Days with no matching expenses are left out.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_totals_by_day(
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<DayTotal>, Error> {
    let where_clause = filter.where_clause();
    let query = format!(
        "SELECT date, SUM(amount) FROM expense {} GROUP BY date ORDER BY date ASC",
        where_clause.sql
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(where_clause.params.iter()), |row| {
            let total: Option<f64> = row.get(1)?;

            Ok(DayTotal {
                date: row.get(0)?,
                total: round_to_cents(total.unwrap_or(0.0)),
            })
        })?
        .map(|result| result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        expense::{
            Expense, create_expense,
            filter::ExpenseFilter,
            query::{ExpenseOrder, get_expenses},
        },
    };

    use super::{
        CategoryTotal, DayTotal, get_aggregates, get_totals_by_category, get_totals_by_day,
        round_to_cents, total_amount,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert_test_expenses(conn: &Connection) {
        for (description, amount, category, date) in [
            ("Coffee", 4.1, "Food", date!(2024 - 01 - 03)),
            ("Sandwich", 8.2, "Food", date!(2024 - 01 - 03)),
            ("Train", 2.55, "Transport", date!(2024 - 01 - 02)),
            ("Rent", 400.0, "Rent", date!(2024 - 01 - 01)),
            ("Pharmacy", 19.99, "Health", date!(2024 - 01 - 10)),
            ("Dinner", 31.3, "Food", date!(2024 - 01 - 10)),
        ] {
            create_expense(Expense::build(description, amount, category, date), conn).unwrap();
        }
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_to_cents(12.3456), 12.35);
        assert_eq!(round_to_cents(12.344), 12.34);
        assert_eq!(round_to_cents(0.1 + 0.2), 0.3);
        assert_eq!(round_to_cents(0.0), 0.0);
    }

    #[test]
    fn total_of_nothing_is_zero() {
        assert_eq!(total_amount(&[]), 0.0);
    }

    #[test]
    fn totals_by_category() {
        let conn = get_test_connection();
        insert_test_expenses(&conn);

        let got = get_totals_by_category(&ExpenseFilter::default(), &conn).unwrap();

        assert_eq!(
            got,
            vec![
                CategoryTotal {
                    category: "Food".to_owned(),
                    total: 43.6
                },
                CategoryTotal {
                    category: "Health".to_owned(),
                    total: 19.99
                },
                CategoryTotal {
                    category: "Rent".to_owned(),
                    total: 400.0
                },
                CategoryTotal {
                    category: "Transport".to_owned(),
                    total: 2.55
                },
            ]
        );
    }

    #[test]
    fn totals_by_day_are_in_date_order() {
        let conn = get_test_connection();
        insert_test_expenses(&conn);

        let got = get_totals_by_day(&ExpenseFilter::default(), &conn).unwrap();

        assert_eq!(
            got,
            vec![
                DayTotal {
                    date: date!(2024 - 01 - 01),
                    total: 400.0
                },
                DayTotal {
                    date: date!(2024 - 01 - 02),
                    total: 2.55
                },
                DayTotal {
                    date: date!(2024 - 01 - 03),
                    total: 12.3
                },
                DayTotal {
                    date: date!(2024 - 01 - 10),
                    total: 51.29
                },
            ]
        );
    }

    #[test]
    fn groups_honour_filter() {
        let conn = get_test_connection();
        insert_test_expenses(&conn);
        let filter = ExpenseFilter::new(Some(date!(2024 - 01 - 03)), None, "Food");

        let by_category = get_totals_by_category(&filter, &conn).unwrap();
        let by_day = get_totals_by_day(&filter, &conn).unwrap();

        assert_eq!(
            by_category,
            vec![CategoryTotal {
                category: "Food".to_owned(),
                total: 43.6
            }]
        );
        assert_eq!(
            by_day,
            vec![
                DayTotal {
                    date: date!(2024 - 01 - 03),
                    total: 12.3
                },
                DayTotal {
                    date: date!(2024 - 01 - 10),
                    total: 31.3
                },
            ]
        );
    }

    #[test]
    fn no_matches_gives_empty_groups() {
        let conn = get_test_connection();
        insert_test_expenses(&conn);
        let filter = ExpenseFilter::new(None, None, "Groceries");

        let aggregates = get_aggregates(&filter, &[], &conn).unwrap();

        assert_eq!(aggregates.total, 0.0);
        assert!(aggregates.by_category.is_empty());
        assert!(aggregates.by_day.is_empty());
    }

    #[test]
    fn category_groups_partition_the_total() {
        let conn = get_test_connection();
        insert_test_expenses(&conn);
        let filters = [
            ExpenseFilter::default(),
            ExpenseFilter::new(Some(date!(2024 - 01 - 02)), Some(date!(2024 - 01 - 03)), ""),
            ExpenseFilter::new(None, None, "Food"),
            ExpenseFilter::new(None, Some(date!(2024 - 01 - 09)), ""),
        ];

        for filter in filters {
            let expenses = get_expenses(&filter, ExpenseOrder::Newest, &conn).unwrap();
            let aggregates = get_aggregates(&filter, &expenses, &conn).unwrap();

            let category_sum: f64 = aggregates.by_category.iter().map(|group| group.total).sum();
            let day_sum: f64 = aggregates.by_day.iter().map(|group| group.total).sum();
            assert_eq!(round_to_cents(category_sum), aggregates.total, "{filter:?}");
            assert_eq!(round_to_cents(day_sum), aggregates.total, "{filter:?}");

            for group in &aggregates.by_category {
                let want = total_amount(
                    &expenses
                        .iter()
                        .filter(|expense| expense.category == group.category)
                        .cloned()
                        .collect::<Vec<_>>(),
                );
                assert_eq!(group.total, want, "{filter:?} {group:?}");
            }

            assert!(
                aggregates
                    .by_day
                    .windows(2)
                    .all(|pair| pair[0].date < pair[1].date),
                "days out of order for {filter:?}"
            );
        }
    }
}
