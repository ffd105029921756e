//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    alternative::{
        create_alternative_endpoint, delete_alternative_endpoint, list_alternatives_endpoint,
    },
    auth::{api_auth_guard, get_log_out, post_log_in, post_sign_up},
    dashboard::{post_alternative_form, post_delete_expense_form, post_expense_form},
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint,
        update_expense_endpoint,
    },
    landing::get_landing_page,
    not_found::{get_404_not_found, method_not_allowed},
    stats::get_stats_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_landing_page))
        .route(endpoints::SIGN_UP, post(post_sign_up))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::EXPENSE_FORM, post(post_expense_form))
        .route(endpoints::DELETE_EXPENSE_FORM, post(post_delete_expense_form))
        .route(endpoints::ALTERNATIVE_FORM, post(post_alternative_form));

    let api_routes = Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(
            endpoints::ALTERNATIVES,
            get(list_alternatives_endpoint).post(create_alternative_endpoint),
        )
        .route(endpoints::ALTERNATIVE, delete(delete_alternative_endpoint))
        .route(endpoints::STATS, get(get_stats_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), api_auth_guard));

    api_routes
        .merge(unprotected_routes)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(get_404_not_found)
        .with_state(state)
}
