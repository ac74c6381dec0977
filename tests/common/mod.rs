#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::LevelFilter;
use serde_json::json;
use spotify_liked::{config::Config, types::Credential};
use tempfile::TempDir;

pub const CACHED_ACCESS: &str = "cached-access";
pub const FRESH_ACCESS: &str = "fresh-access";
pub const FRESH_REFRESH: &str = "fresh-refresh";
pub const REFRESHED_ACCESS: &str = "refreshed-access";
pub const STALE_REFRESH: &str = "stale-refresh";
pub const GOOD_CODE: &str = "good-code";
pub const TRACK_ID: &str = "4uLU6hMCjMI75M1A2tKUQC";

#[derive(Default)]
struct Inner {
    playing: Option<String>,
    saved: HashSet<String>,
    contains_fails: bool,
}

/// In-process stand-in for the Spotify accounts service and Web API.
#[derive(Clone, Default)]
pub struct MockSpotify {
    inner: Arc<Mutex<Inner>>,
    pub user_calls: Arc<AtomicUsize>,
    pub contains_calls: Arc<AtomicUsize>,
    pub token_calls: Arc<AtomicUsize>,
    addr: Arc<Mutex<Option<SocketAddr>>>,
}

impl MockSpotify {
    pub async fn start() -> Self {
        let mock = MockSpotify::default();
        let app = Router::new()
            .route("/v1/me", get(me))
            .route("/v1/me/player/currently-playing", get(currently_playing))
            .route("/v1/me/tracks/contains", get(contains))
            .route("/api/token", post(token))
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        *mock.addr.lock().unwrap() = Some(addr);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        mock
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr.lock().unwrap().unwrap())
    }

    pub fn play(&self, track_id: Option<&str>) {
        self.inner.lock().unwrap().playing = track_id.map(str::to_string);
    }

    pub fn save_track(&self, track_id: &str) {
        self.inner.lock().unwrap().saved.insert(track_id.to_string());
    }

    pub fn fail_contains(&self) {
        self.inner.lock().unwrap().contains_fails = true;
    }

    pub fn config(&self, credential_path: PathBuf, server_addr: SocketAddr) -> Config {
        let base = self.base_url();
        Config {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_uri: format!("http://{}/callback", server_addr),
            server_addr,
            auth_url: format!("{}/authorize", base),
            token_url: format!("{}/api/token", base),
            api_url: format!("{}/v1", base),
            credential_path,
            open_browser: false,
            log_level: LevelFilter::Warn,
        }
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    matches!(
        value.strip_prefix("Bearer "),
        Some(CACHED_ACCESS) | Some(FRESH_ACCESS) | Some(REFRESHED_ACCESS)
    )
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "Invalid access token" } })),
    )
        .into_response()
}

async fn me(State(mock): State<MockSpotify>, headers: HeaderMap) -> Response {
    mock.user_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "id": "tester", "display_name": "Test User" })).into_response()
}

async fn currently_playing(State(mock): State<MockSpotify>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let playing = mock.inner.lock().unwrap().playing.clone();
    match playing {
        None => StatusCode::NO_CONTENT.into_response(),
        Some(id) => Json(json!({
            "is_playing": true,
            "currently_playing_type": "track",
            "item": { "id": id, "name": "Test Song", "type": "track", "is_local": false }
        }))
        .into_response(),
    }
}

async fn contains(
    State(mock): State<MockSpotify>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    mock.contains_calls.fetch_add(1, Ordering::SeqCst);
    let inner = mock.inner.lock().unwrap();
    if inner.contains_fails {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let ids = params.get("ids").cloned().unwrap_or_default();
    let answer: Vec<bool> = ids.split(',').map(|id| inner.saved.contains(id)).collect();
    Json(answer).into_response()
}

async fn token(
    State(mock): State<MockSpotify>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    mock.token_calls.fetch_add(1, Ordering::SeqCst);
    let grant = form.get("grant_type").map(String::as_str);
    match grant {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some(GOOD_CODE) => {
            Json(json!({
                "access_token": FRESH_ACCESS,
                "token_type": "Bearer",
                "scope": "user-read-playback-state user-library-read",
                "expires_in": 3600,
                "refresh_token": FRESH_REFRESH
            }))
            .into_response()
        }
        Some("refresh_token")
            if form.get("refresh_token").map(String::as_str) == Some(STALE_REFRESH) =>
        {
            Json(json!({
                "access_token": REFRESHED_ACCESS,
                "token_type": "Bearer",
                "scope": "user-read-playback-state user-library-read",
                "expires_in": 3600
            }))
            .into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
            .into_response(),
    }
}

/// Credential path inside a fresh temporary directory.
///
/// The directory is removed when the returned [`TempDir`] is dropped, so
/// keep it alive for the whole test.
pub fn temp_credential_path(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::Builder::new()
        .prefix(&format!("spotify-liked-{}-", name))
        .tempdir()
        .unwrap();
    let path = dir.path().join(".spotify_auth");
    (dir, path)
}

pub fn write_credential(path: &PathBuf, credential: &Credential) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(credential).unwrap()).unwrap();
}

pub fn read_credential(path: &PathBuf) -> Credential {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

pub fn cached_credential() -> Credential {
    Credential {
        access_token: CACHED_ACCESS.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: Some("cached-refresh".to_string()),
        expiry: Some(chrono::Utc::now() + chrono::Duration::hours(1)),
    }
}

/// Loopback address with a port that was free a moment ago.
pub fn free_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Plays the browser's part: hits the callback until the listener is up.
pub async fn complete_login(addr: SocketAddr, code: &str, state: &str) -> reqwest::Response {
    let url = format!("http://{}/callback?code={}&state={}", addr, code, state);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        match reqwest::get(&url).await {
            Ok(response) => return response,
            Err(_) if tokio::time::Instant::now() < deadline => {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Err(e) => panic!("callback listener never came up: {}", e),
        }
    }
}
