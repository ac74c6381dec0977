use std::net::SocketAddr;

use axum::{Router, routing::get};
use tokio::net::TcpListener;

use crate::{
    LikedError,
    api::{self, CallbackState},
};

/// Registers the callback and catch-all handlers.
pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/callback", get(api::callback))
        .fallback(api::fallback)
        .with_state(state)
}

/// Binds the callback listener.
///
/// # Arguments
///
/// * `addr` - local address the OAuth redirect URI points at
///
/// # Errors
///
/// Returns [`LikedError::Bind`] if the address is in use or not local.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, LikedError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| LikedError::Bind { addr, source })
}

/// Serves `app` until the process exits.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), LikedError> {
    axum::serve(listener, app).await.map_err(LikedError::Serve)
}
