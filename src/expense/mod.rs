//! Expenses: recording, listing, editing and deleting spending events.

mod create;
mod db;
mod delete;
mod domain;
mod list;
mod update;

pub use create::create_expense_endpoint;
pub use db::{
    create_expense, create_expense_table, delete_expense, get_all_expenses, get_expense,
    get_expenses_in_recorded_order, update_expense,
};
pub use delete::delete_expense_endpoint;
pub use domain::{Expense, ExpenseData, ExpenseId, NewExpense};
pub use list::list_expenses_endpoint;
pub use update::update_expense_endpoint;
