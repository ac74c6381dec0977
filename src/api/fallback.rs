use axum::{
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
};

use crate::info;

/// Catch-all for anything except `/callback`.
///
/// Browsers ask for `/favicon.ico` and sometimes `/`. The request is logged
/// and answered with `404 Not found`.
pub async fn fallback(method: Method, uri: Uri) -> impl IntoResponse {
    info!("Got request for: {} {}", method, uri);
    (StatusCode::NOT_FOUND, "Not found")
}
