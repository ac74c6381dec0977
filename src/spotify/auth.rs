use reqwest::{Client, Url};

use crate::{
    config::Config,
    debug,
    types::{Credential, TokenResponse},
};

/// Fixed anti-forgery value echoed back by the accounts service.
pub const AUTH_STATE: &str = "spotifyLiked";

/// Read playback state, read saved library.
pub const SCOPES: [&str; 2] = ["user-read-playback-state", "user-library-read"];

/// OAuth 2.0 authorization code client for the Spotify accounts service.
///
/// Built once at startup and shared (behind an `Arc`) by the launcher, the
/// callback handler and every [`SpotifyClient`](super::SpotifyClient), which
/// uses it to refresh expired credentials.
#[derive(Debug, Clone)]
pub struct OAuth {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    api_url: String,
}

impl OAuth {
    /// Creates the client from the credentials and endpoints in `config`.
    ///
    /// A trailing `/` on the API base URL is dropped so paths can be appended
    /// with `format!("{}/me", ..)`.
    pub fn new(config: &Config) -> Self {
        OAuth {
            http: Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Web API base URL without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Builds the URL the user opens to grant access.
    pub fn authorize_url(&self, state: &str) -> String {
        let scope = SCOPES.join(" ");
        let params = [
            ("client_id", self.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("state", state),
        ];

        match Url::parse_with_params(&self.auth_url, &params) {
            Ok(url) => url.to_string(),
            Err(_) => {
                // Unparsable base URL: fall back to plain concatenation so the
                // user still sees something actionable.
                let query = params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join("&");
                format!("{}?{}", self.auth_url, query)
            }
        }
    }

    /// Exchanges an authorization code received on the callback.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, reqwest::Error> {
        debug!("Exchanging authorization code");
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let token = response.json::<TokenResponse>().await?;
        Ok(token.into_credential(None))
    }

    /// Exchanges the refresh token of `credential` for a new access token.
    ///
    /// The returned credential keeps the old refresh token if the service
    /// does not rotate it.
    pub async fn refresh(&self, credential: &Credential) -> Result<Credential, reqwest::Error> {
        let refresh_token = credential.refresh_token.clone().unwrap_or_default();
        debug!("Refreshing access token");
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let token = response.json::<TokenResponse>().await?;
        Ok(token.into_credential(credential.refresh_token.clone()))
    }
}
