//! Expense tracking.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the database functions for storing and deleting expenses
//! - The filter shared by the expenses page, its totals and the CSV export
//! - The route handlers for listing, adding, deleting and exporting expenses

mod aggregation;
mod charts;
mod core;
mod create_endpoint;
mod date;
mod delete_endpoint;
mod export_endpoint;
mod filter;
mod list_page;
mod query;
mod view;

pub use core::{
    Expense, NewExpense, count_expenses, create_expense, create_expense_table, delete_expense,
    get_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use export_endpoint::export_expenses_endpoint;
pub use list_page::get_expenses_page;
