//! The dashboard shown to logged in users on the landing page, and the forms
//! it posts to.

mod filter;
mod forms;
mod insights;
mod view;

pub use filter::DashboardFilter;
pub use forms::{post_alternative_form, post_delete_expense_form, post_expense_form};
pub use view::dashboard_page;
