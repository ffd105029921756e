//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

/// The landing page, which shows the dashboard or the log in/sign up forms.
pub const ROOT: &str = "/";
/// The route for creating a new user.
pub const SIGN_UP: &str = "/signup";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";

/// The route the dashboard's add expense form posts to.
pub const EXPENSE_FORM: &str = "/expenses";
/// The route the dashboard's delete buttons post to.
pub const DELETE_EXPENSE_FORM: &str = "/expenses/{expense_id}/delete";
/// The route the dashboard's add alternative form posts to.
pub const ALTERNATIVE_FORM: &str = "/alternatives";

/// The prefix shared by all JSON API routes.
pub const API_PREFIX: &str = "/api";

/// The route to list and create expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to list and create alternatives.
pub const ALTERNATIVES: &str = "/api/alternatives";
/// The route to delete a single alternative.
pub const ALTERNATIVE: &str = "/api/alternatives/{alternative_id}";
/// The route for aggregate spending statistics.
pub const STATS: &str = "/api/stats";

/// The query parameter value on [ROOT] that selects the sign up form.
pub const SIGN_UP_VIEW: &str = "signup";
/// A link to the sign up form.
pub const SIGN_UP_PAGE: &str = "/?view=signup";

/// Whether `path` is [API_PREFIX] or a path under it.
pub fn is_api_path(path: &str) -> bool {
    path.strip_prefix(API_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
