use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    LikedError, debug,
    handoff::HandoffSender,
    launcher::FlowPhase,
    spotify::{OAuth, SpotifyClient},
    success,
    types::LikedStatus,
    warning,
};

/// Shown in the browser once the code was exchanged. Closes its own tab.
pub const LOGIN_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<script>
  window.addEventListener('load', function() {
    window.close();
  });
</script>
<meta http-equiv="Content-Type" content="text/html; charset=utf-8"/>
<title>Login successful</title>
</head>
<body>
Login successful
</body>
</html>
"#;

/// Shared state of the callback listener.
#[derive(Clone)]
pub struct CallbackState {
    pub oauth: Arc<OAuth>,
    pub expected_state: String,
    pub clients: HandoffSender<SpotifyClient>,
    pub outcome: HandoffSender<Result<LikedStatus, LikedError>>,
}

impl CallbackState {
    fn fail(&self, err: LikedError) {
        debug!("Authorization flow is now {}", FlowPhase::Failed);
        if !self.outcome.offer(Err(err)) {
            debug!("Outcome already decided, dropping callback failure");
        }
    }
}

/// Handles the OAuth redirect from the accounts service.
///
/// Checks run in order, and only the last one reaches the network:
///
/// 1. `state` must equal the expected anti-forgery value, otherwise `404`
/// 2. an `error` parameter means the user declined, `403`
/// 3. a missing `code` is a malformed redirect, `400`
/// 4. the `code` is exchanged for a credential
///
/// A successful exchange offers a [`SpotifyClient`] on the client hand-off
/// and answers with [`LOGIN_PAGE_HTML`]. Every failure is offered as the
/// final outcome instead. A second valid callback gets the same page but its
/// client is dropped.
///
/// # Arguments
///
/// * `state` - shared listener state
/// * `params` - query parameters of the redirect
pub async fn callback(
    State(state): State<CallbackState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let received = params.get("state").cloned();
    if received.as_deref() != Some(state.expected_state.as_str()) {
        warning!(
            "State mismatch: {:?} != {}",
            received.as_deref().unwrap_or_default(),
            state.expected_state
        );
        state.fail(LikedError::StateMismatch {
            received,
            expected: state.expected_state.clone(),
        });
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    if let Some(reason) = params.get("error") {
        state.fail(LikedError::AuthorizationDenied(reason.clone()));
        return (StatusCode::FORBIDDEN, Html("<h4>Login was cancelled.</h4>")).into_response();
    }

    let Some(code) = params.get("code") else {
        state.fail(LikedError::MissingCode);
        return (StatusCode::BAD_REQUEST, Html("<h4>Missing authorization code.</h4>"))
            .into_response();
    };

    match state.oauth.exchange_code(code).await {
        Ok(credential) => {
            debug!("Authorization flow is now {}", FlowPhase::TokenExchanged);
            let client = SpotifyClient::new(Arc::clone(&state.oauth), credential);
            if state.clients.offer(client) {
                success!("Login successful");
            } else {
                debug!("A client was already handed off, ignoring duplicate callback");
            }
            Html(LOGIN_PAGE_HTML).into_response()
        }
        Err(e) => {
            state.fail(LikedError::TokenExchange(e));
            (StatusCode::FORBIDDEN, "Couldn't get token").into_response()
        }
    }
}
