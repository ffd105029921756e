//! Rendering the dashboard page.

use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Alternative, Error, Expense, User,
    alternative::get_all_alternatives,
    dashboard::{
        filter::{DashboardFilter, NECESSARY, UNNECESSARY},
        insights::{Insight, generate_insights},
    },
    endpoints::{self, format_endpoint},
    expense::get_all_expenses,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, NoticeKind,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, notice, text_input,
    },
    stats::{Stats, get_stats},
};

/// Categories offered in the forms before any have been used.
const COMMON_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Entertainment",
    "Health",
    "Other",
];

const SECTION_HEADING_STYLE: &str = "text-xl font-bold mb-2";
const FORM_STYLE: &str = "grid grid-cols-1 md:grid-cols-3 gap-4 w-full mb-4";

/// Load the user's data and render the dashboard page.
///
/// `filter` narrows the expense table only; the statistics, insights and
/// other sections always cover every expense. `notice` is shown above the
/// forms, e.g. to explain why a submission was rejected.
pub fn dashboard_page(
    user: &User,
    connection: &Connection,
    filter: &DashboardFilter,
    notice: Option<(NoticeKind, &str)>,
) -> Result<Markup, Error> {
    let expenses = get_all_expenses(connection)?;
    let alternatives = get_all_alternatives(connection)?;
    let stats = get_stats(connection)?;

    Ok(dashboard_view(
        user,
        &expenses,
        &alternatives,
        &stats,
        filter,
        notice,
    ))
}

fn dashboard_view(
    user: &User,
    expenses: &[Expense],
    alternatives: &[Alternative],
    stats: &Stats,
    filter: &DashboardFilter,
    notice_message: Option<(NoticeKind, &str)>,
) -> Markup {
    let categories = category_options(stats);
    let insights = generate_insights(stats);

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            header class="flex w-full justify-between items-center mb-6"
            {
                h1 class="text-2xl font-bold" { "Welcome, " (user.username) }
                a href=(endpoints::LOG_OUT) class=(LINK_STYLE) { "Log out" }
            }

            @if let Some((kind, message)) = notice_message {
                div id="notice" class="w-full mb-4" { (notice(kind, message)) }
            }

            (stat_cards(stats))
            (insight_list(&insights))
            (category_table(stats))
            (expense_form(&categories))
            (expense_table(expenses, filter, &categories))
            (unnecessary_list(expenses))
            (alternative_form(expenses))
            (alternative_table(alternatives, expenses))
        }
    };

    base("Dashboard", &content)
}

/// The common categories followed by any other category that has been used.
fn category_options(stats: &Stats) -> Vec<&str> {
    let mut categories: Vec<&str> = COMMON_CATEGORIES.to_vec();

    for (category, _) in stats.categories.iter() {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    categories
}

fn stat_card(id: &str, label: &str, value: &str) -> Markup {
    html! {
        div id=(id) class="stat-card p-4 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            h2 class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class="stat-value text-xl font-semibold" { (value) }
        }
    }
}

fn stat_cards(stats: &Stats) -> Markup {
    html! {
        section id="summary" class="grid grid-cols-2 lg:grid-cols-5 gap-4 w-full mb-6"
        {
            (stat_card("total", "Total spent", &format_currency(stats.total)))
            (stat_card("necessary", "Necessary", &format_currency(stats.necessary)))
            (stat_card("unnecessary", "Unnecessary", &format_currency(stats.unnecessary)))
            (stat_card(
                "potential-savings",
                "Potential savings",
                &format_currency(stats.potential_savings),
            ))
            (stat_card("expense-count", "Expenses", &stats.expense_count.to_string()))
        }
    }
}

fn insight_list(insights: &[Insight]) -> Markup {
    html! {
        section id="insights" class="w-full mb-6"
        {
            h2 class=(SECTION_HEADING_STYLE) { "Insights" }

            @if insights.is_empty() {
                p { "Record some expenses to see insights." }
            } @else {
                div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    @for insight in insights {
                        div class="insight p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                        {
                            h3 class="font-semibold" { (insight.title) }
                            p { (insight.description) }
                        }
                    }
                }
            }
        }
    }
}

fn category_table(stats: &Stats) -> Markup {
    html! {
        section id="categories" class="w-full mb-6"
        {
            h2 class=(SECTION_HEADING_STYLE) { "Spending by category" }

            @if stats.categories.is_empty() {
                p { "No expenses recorded yet." }
            } @else {
                table class="w-full text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                        }
                    }
                    tbody
                    {
                        @for (category, total) in stats.categories.iter() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (category) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(total)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_form(categories: &[&str]) -> Markup {
    html! {
        section id="add-expense" class="w-full mb-6"
        {
            h2 class=(SECTION_HEADING_STYLE) { "Add an expense" }

            form method="post" action=(endpoints::EXPENSE_FORM) class=(FORM_STYLE)
            {
                (text_input("Description", "description", "text", "", false))

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        type="number"
                        name="amount"
                        id="amount"
                        step="0.01"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
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

                (text_input("Date", "date", "date", "", false))

                div
                {
                    label for="is_necessary" class=(FORM_LABEL_STYLE) { "Type" }
                    select name="is_necessary" id="is_necessary" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="true" { "Necessary" }
                        option value="false" { "Unnecessary" }
                    }
                }

                div
                {
                    label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }
                    textarea name="notes" id="notes" class=(FORM_TEXT_INPUT_STYLE) {}
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add expense" }
            }
        }
    }
}

fn expense_filter_form(filter: &DashboardFilter, categories: &[&str]) -> Markup {
    let selected_category = filter.category.as_deref();
    let selected_date = filter.date.as_deref().unwrap_or_default();

    html! {
        form id="expense-filter" method="get" action=(endpoints::ROOT) class=(FORM_STYLE)
        {
            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="filter-category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All categories" }
                    @for category in categories {
                        option value=(category) selected[selected_category == Some(*category)]
                        {
                            (category)
                        }
                    }
                }
            }

            div
            {
                label for="filter-necessity" class=(FORM_LABEL_STYLE) { "Type" }
                select name="necessity" id="filter-necessity" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All types" }
                    option value=(NECESSARY) selected[filter.is_necessary == Some(true)]
                    {
                        "Necessary"
                    }
                    option value=(UNNECESSARY) selected[filter.is_necessary == Some(false)]
                    {
                        "Unnecessary"
                    }
                }
            }

            div
            {
                label for="filter-date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    type="date"
                    name="date"
                    id="filter-date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(selected_date);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }

            @if filter.is_active() {
                a href=(endpoints::ROOT) class=(LINK_STYLE) { "Clear filters" }
            }
        }
    }
}

fn expense_table(expenses: &[Expense], filter: &DashboardFilter, categories: &[&str]) -> Markup {
    let shown: Vec<&Expense> = expenses
        .iter()
        .filter(|expense| filter.matches(expense))
        .collect();

    html! {
        section id="expenses" class="w-full mb-6"
        {
            h2 class=(SECTION_HEADING_STYLE) { "Expenses" }

            (expense_filter_form(filter, categories))

            @if expenses.is_empty() {
                p { "No expenses recorded yet." }
            } @else if shown.is_empty() {
                p { "No expenses match the filters." }
            } @else {
                table class="w-full text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Necessary" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }
                    tbody
                    {
                        @for expense in shown {
                            tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (expense.date) }
                                td class=(TABLE_CELL_STYLE) { (expense.description) }
                                td class=(TABLE_CELL_STYLE) { (expense.category) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @if expense.is_necessary { "Yes" } @else { "No" }
                                }
                                td class=(TABLE_CELL_STYLE) { (expense.notes) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    form
                                        method="post"
                                        action=(format_endpoint(endpoints::DELETE_EXPENSE_FORM, expense.id))
                                    {
                                        button type="submit" class=(LINK_STYLE) { "Delete" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn unnecessary_list(expenses: &[Expense]) -> Markup {
    let unnecessary: Vec<&Expense> = expenses
        .iter()
        .filter(|expense| !expense.is_necessary)
        .collect();
    let total = unnecessary
        .iter()
        .fold(0.0, |total, expense| total + expense.amount);

    html! {
        section id="unnecessary-expenses" class="w-full mb-6"
        {
            h2 class=(SECTION_HEADING_STYLE) { "Unnecessary expenses" }

            p class="unnecessary-total" { "Could save " (format_currency(total)) }

            @if unnecessary.is_empty() {
                p { "No unnecessary expenses found. Great job!" }
            } @else {
                div class="grid grid-cols-1 md:grid-cols-3 gap-4"
                {
                    @for expense in unnecessary {
                        div
                            class="unnecessary-card p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                            data-expense-id=(expense.id)
                        {
                            h3 class="font-semibold" { (expense.description) }
                            p class="text-sm text-gray-500" { (expense.category) }
                            p class="font-semibold" { (format_currency(expense.amount)) }
                            p
                            {
                                @if expense.notes.is_empty() {
                                    "This expense could be reduced or eliminated to save money."
                                } @else {
                                    (expense.notes)
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn alternative_form(expenses: &[Expense]) -> Markup {
    html! {
        section id="add-alternative" class="w-full mb-6"
        {
            h2 class=(SECTION_HEADING_STYLE) { "Suggest an alternative" }

            @if expenses.is_empty() {
                p { "Record an expense before suggesting an alternative." }
            } @else {
                form method="post" action=(endpoints::ALTERNATIVE_FORM) class=(FORM_STYLE)
                {
                    div
                    {
                        label for="expense_id" class=(FORM_LABEL_STYLE) { "Instead of" }
                        select name="expense_id" id="expense_id" class=(FORM_TEXT_INPUT_STYLE) required
                        {
                            @for expense in expenses {
                                option value=(expense.id)
                                {
                                    (expense.description) " - " (format_currency(expense.amount))
                                }
                            }
                        }
                    }

                    (text_input("Suggestion", "suggestion", "text", "", false))

                    div
                    {
                        label for="savings" class=(FORM_LABEL_STYLE) { "Savings" }
                        input
                            type="number"
                            name="savings"
                            id="savings"
                            step="0.01"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    div
                    {
                        label for="benefits" class=(FORM_LABEL_STYLE) { "Benefits" }
                        textarea name="benefits" id="benefits" class=(FORM_TEXT_INPUT_STYLE) {}
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add alternative" }
                }
            }
        }
    }
}

fn alternative_table(alternatives: &[Alternative], expenses: &[Expense]) -> Markup {
    let expense_description = |alternative: &Alternative| {
        expenses
            .iter()
            .find(|expense| expense.id == alternative.expense_id)
            .map(|expense| expense.description.as_str())
            .unwrap_or_default()
    };

    html! {
        section id="alternatives" class="w-full mb-6"
        {
            h2 class=(SECTION_HEADING_STYLE) { "Cheaper alternatives" }

            @if alternatives.is_empty() {
                p { "No alternatives suggested yet." }
            } @else {
                table class="w-full text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Instead of" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Suggestion" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Savings" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Benefits" }
                        }
                    }
                    tbody
                    {
                        @for alternative in alternatives {
                            tr class=(TABLE_ROW_STYLE) data-alternative-id=(alternative.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (expense_description(alternative)) }
                                td class=(TABLE_CELL_STYLE) { (alternative.suggestion) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(alternative.savings)) }
                                td class=(TABLE_CELL_STYLE) { (alternative.benefits) }
                            }
                        }
                    }
                }
            }
        }
    }
}
