use std::{fmt, net::SocketAddr};

use axum::Router;

use crate::{LikedError, debug, info, server, spotify::OAuth, warning};

/// Progress of the interactive authorization flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    ListenerStarted,
    AwaitingCallback,
    TokenExchanged,
    Failed,
}

impl fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowPhase::Idle => "idle",
            FlowPhase::ListenerStarted => "listener started",
            FlowPhase::AwaitingCallback => "awaiting callback",
            FlowPhase::TokenExchanged => "token exchanged",
            FlowPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Starts the browser-based authorization code flow.
///
/// Binds the callback listener on `addr`, points the user's browser at the
/// authorize URL and then serves `app` for the rest of the process. The
/// callback handler in `app` completes the flow; this function only returns
/// if the listener cannot be bound or stops serving.
///
/// # Errors
///
/// [`LikedError::Bind`] if `addr` is unavailable, [`LikedError::Serve`] if
/// the listener fails afterwards.
pub async fn launch(
    oauth: &OAuth,
    addr: SocketAddr,
    app: Router,
    state: &str,
    open_browser: bool,
) -> Result<(), LikedError> {
    debug!("Authorization flow is now {}", FlowPhase::Idle);
    let listener = server::bind(addr).await?;
    debug!("Authorization flow is now {}", FlowPhase::ListenerStarted);

    let auth_url = oauth.authorize_url(state);
    open_authorize_url(&auth_url, open_browser);
    debug!("Authorization flow is now {}", FlowPhase::AwaitingCallback);

    server::serve(listener, app).await
}

fn open_authorize_url(auth_url: &str, open_browser: bool) {
    if !open_browser {
        warning!("Log in to Spotify by opening:\n{}", auth_url);
        return;
    }

    info!("Opening browser for Spotify login");
    if let Err(e) = webbrowser::open(auth_url) {
        warning!(
            "Failed to open browser ({}). Please navigate to the following URL manually:\n{}",
            e,
            auth_url
        );
    }
}
