//! Renders the expenses page: forms, totals, charts and the expense table.

use maud::{Markup, html};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    alert::Alert,
    endpoints::{self, format_endpoint},
    expense::{
        aggregation::Aggregates,
        charts::{ECHARTS_SCRIPT, charts_script, charts_view, expense_charts},
        core::Expense,
        filter::FilterQuery,
    },
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles, format_currency,
    },
};

/// The max number of graphemes to display in the expense table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// Everything shown on the expenses page.
pub(super) struct ExpensesPageData<'a> {
    pub alerts: Vec<Alert>,
    pub categories: &'a [String],
    pub today: Date,
    /// The filter as typed by the user, used to fill the filter form back in.
    pub filter_query: &'a FilterQuery,
    pub expenses: &'a [Expense],
    pub aggregates: &'a Aggregates,
}

pub(super) fn expenses_view(data: ExpensesPageData) -> Markup {
    let charts = expense_charts(&data.aggregates.by_category, &data.aggregates.by_day);
    let export_link = export_link(data.filter_query);

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(export_link) class=(LINK_STYLE) data-export-link="true"
                    {
                        "Export CSV"
                    }
                }

                @for alert in data.alerts {
                    (alert.into_html())
                }

                div class="grid grid-cols-1 lg:grid-cols-2 gap-4"
                {
                    (add_expense_form(data.categories, data.today))
                    (filter_form(data.categories, data.filter_query))
                }

                p class="text-lg"
                {
                    "Total: "
                    span id="total" class="font-semibold" { (format_currency(data.aggregates.total)) }
                }

                (charts_view(&charts))

                (expense_table(data.expenses))
            }
        }
    };

    base(
        "Expenses",
        &[
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            charts_script(&charts),
            dollar_input_styles(),
        ],
        &content,
    )
}

fn export_link(filter_query: &FilterQuery) -> String {
    let query_string = filter_query.to_query_string();

    if query_string.is_empty() {
        endpoints::EXPORT.to_owned()
    } else {
        format!("{}?{query_string}", endpoints::EXPORT)
    }
}

fn add_expense_form(categories: &[String], today: Date) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::ADD_EXPENSE)
            id="add-expense"
            class="space-y-4 rounded bg-white dark:bg-gray-800 p-4"
        {
            h2 class="text-lg font-semibold" { "Add Expense" }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    type="text"
                    name="description"
                    id="description"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                div class="input-wrapper"
                {
                    input
                        type="number"
                        name="amount"
                        id="amount"
                        min="0.01"
                        step="0.01"
                        placeholder="0.00"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE) required
                {
                    @for category in categories {
                        option value=(category) { (category) }
                    }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    type="date"
                    name="date"
                    id="date"
                    value=(today)
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
        }
    }
}

fn filter_form(categories: &[String], filter_query: &FilterQuery) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::ROOT)
            id="filter-expenses"
            class="space-y-4 rounded bg-white dark:bg-gray-800 p-4"
        {
            h2 class="text-lg font-semibold" { "Filter" }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="start" class=(FORM_LABEL_STYLE) { "From" }
                    input
                        type="date"
                        name="start"
                        id="start"
                        value=(filter_query.start)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="end" class=(FORM_LABEL_STYLE) { "To" }
                    input
                        type="date"
                        name="end"
                        id="end"
                        value=(filter_query.end)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="filter-category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[filter_query.category.is_empty()] { "All categories" }

                    @for category in categories {
                        option value=(category) selected[*category == filter_query.category]
                        {
                            (category)
                        }
                    }
                }
            }

            div class="flex items-center gap-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
                a href=(endpoints::ROOT) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}

fn expense_table(expenses: &[Expense]) -> Markup {
    html! {
        table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class="px-6 py-3 text-right" { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @for expense in expenses {
                    (expense_row_view(expense))
                }

                @if expenses.is_empty() {
                    tr
                    {
                        td
                            colspan="5"
                            data-empty-state="true"
                            class="px-6 py-4 text-center"
                        {
                            "No expenses found."
                        }
                    }
                }
            }
        }
    }
}

fn expense_row_view(expense: &Expense) -> Markup {
    let (description, tooltip) = format_description(&expense.description);
    let delete_url = format_endpoint(endpoints::DELETE_EXPENSE, expense.id);
    let confirm_script = confirm_delete_script(&expense.description);

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-row="true"
        {
            td class=(TABLE_CELL_STYLE) { time datetime=(expense.date) { (expense.date) } }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
            }
            td class="px-6 py-4 text-right" { (format_currency(expense.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                form method="post" action=(delete_url) onsubmit=(confirm_script)
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}

/// The `onsubmit` handler that asks the user to confirm deleting an expense.
fn confirm_delete_script(description: &str) -> String {
    let message =
        format!("Are you sure you want to delete the expense '{description}'? This cannot be undone.");

    match serde_json::to_string(&message) {
        Ok(message) => format!("return confirm({message});"),
        Err(error) => {
            tracing::error!("could not encode delete confirmation for {description:?}: {error}");
            "return confirm(\"Are you sure you want to delete this expense?\");".to_owned()
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}
