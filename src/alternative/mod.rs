//! Alternatives: cheaper substitutes suggested for recorded expenses.

mod create;
mod db;
mod delete;
mod domain;
mod list;

pub use create::create_alternative_endpoint;
pub use db::{create_alternative, create_alternative_table, delete_alternative, get_all_alternatives};
pub use delete::delete_alternative_endpoint;
pub use domain::{Alternative, AlternativeData, AlternativeId, NewAlternative};
pub use list::list_alternatives_endpoint;
