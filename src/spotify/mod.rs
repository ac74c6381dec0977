//! # Spotify Integration Module
//!
//! Thin client for the handful of Spotify endpoints this tool needs:
//!
//! - `GET /me` - cheap authenticated call used to validate a credential
//! - `GET /me/player/currently-playing` - current playback snapshot
//! - `GET /me/tracks/contains` - saved-library membership
//! - `POST /api/token` - authorization code exchange and token refresh
//!   (see [`auth`])
//!
//! A [`SpotifyClient`] owns its [`Credential`]. It is moved, never shared,
//! from whichever component authenticated it to the component that uses it.

pub mod auth;

use std::sync::Arc;

use reqwest::StatusCode;

use crate::{
    debug,
    types::{Credential, CurrentlyPlayingResponse, PlaybackState, User},
};

pub use auth::OAuth;

/// Authenticated capability to call the Web API on behalf of the user.
#[derive(Debug)]
pub struct SpotifyClient {
    oauth: Arc<OAuth>,
    credential: Credential,
}

impl SpotifyClient {
    /// Wraps `credential`. Nothing is validated until the first call.
    pub fn new(oauth: Arc<OAuth>, credential: Credential) -> Self {
        SpotifyClient { oauth, credential }
    }

    /// Current credential, including any refresh that happened since
    /// construction.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Refreshes the credential if it expired and can be refreshed.
    ///
    /// Returns `true` when a new token was issued.
    pub async fn refresh_if_expired(&mut self) -> Result<bool, reqwest::Error> {
        if !self.credential.is_expired() || !self.credential.can_refresh() {
            return Ok(false);
        }

        self.credential = self.oauth.refresh(&self.credential).await?;
        Ok(true)
    }

    async fn bearer(&mut self) -> Result<String, reqwest::Error> {
        self.refresh_if_expired().await?;
        Ok(self.credential.access_token.clone())
    }

    /// Looks up the user the credential belongs to.
    pub async fn current_user(&mut self) -> Result<Option<User>, reqwest::Error> {
        let token = self.bearer().await?;
        let url = format!("{}/me", self.oauth.api_url());
        let response = self
            .oauth
            .http()
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let user = response.json::<Option<User>>().await?;
        Ok(user)
    }

    /// Fetches what the user is playing right now.
    ///
    /// `204 No Content` means nothing is playing. Spotify sometimes answers
    /// that way even while playback is active.
    pub async fn currently_playing(&mut self) -> Result<PlaybackState, reqwest::Error> {
        let token = self.bearer().await?;
        let url = format!("{}/me/player/currently-playing", self.oauth.api_url());
        let response = self
            .oauth
            .http()
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        if response.status() == StatusCode::NO_CONTENT {
            debug!("Player returned no content");
            return Ok(PlaybackState::Nothing);
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(PlaybackState::Nothing);
        }
        let playing = match serde_json::from_slice::<Option<CurrentlyPlayingResponse>>(&body) {
            Ok(playing) => playing,
            Err(e) => {
                debug!("Unreadable player response: {}", e);
                None
            }
        };
        Ok(PlaybackState::from(playing))
    }

    /// Checks whether `track_id` is saved in the user's library.
    pub async fn has_saved_track(&mut self, track_id: &str) -> Result<bool, reqwest::Error> {
        let token = self.bearer().await?;
        let url = format!("{}/me/tracks/contains", self.oauth.api_url());
        let saved = self
            .oauth
            .http()
            .get(&url)
            .query(&[("ids", track_id)])
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<bool>>()
            .await?;

        Ok(saved.first().copied().unwrap_or(false))
    }
}
