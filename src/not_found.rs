//! Fallback responses for unknown routes and unsupported methods.
//!
//! API paths get the JSON error envelope, everything else gets an HTML page.

use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::{Error, endpoints, html::error_view};

/// Render the 404 page, or a JSON 404 error for API paths.
pub async fn get_404_not_found(uri: Uri) -> Response {
    if endpoints::is_api_path(uri.path()) {
        return Error::NotFound.into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "Not Found",
                "404",
                "Something's missing.",
                "Sorry, we can't find that page. You'll find lots to explore on the home page.",
            )
            .into_string(),
        ),
    )
        .into_response()
}

/// Respond to a known path requested with a method it does not support.
pub async fn method_not_allowed(uri: Uri) -> Response {
    if endpoints::is_api_path(uri.path()) {
        return Error::MethodNotAllowed.into_response();
    }

    StatusCode::METHOD_NOT_ALLOWED.into_response()
}
