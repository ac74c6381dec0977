use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Refresh this long before the recorded expiry.
const EXPIRY_DELTA_SECS: i64 = 10;

/// OAuth bearer token as cached on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A missing expiry, or the zero timestamp some OAuth libraries write
    /// for one, never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) if expiry.timestamp() > 0 => {
                now + Duration::seconds(EXPIRY_DELTA_SECS) >= expiry
            }
            _ => false,
        }
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}

/// Response body of the accounts service token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// Converts the response into a credential, keeping `previous_refresh`
    /// when the response does not rotate the refresh token.
    pub fn into_credential(self, previous_refresh: Option<String>) -> Credential {
        let obtained_at = Utc::now();
        let token_type = if self.token_type.is_empty() {
            "Bearer".to_string()
        } else {
            self.token_type
        };

        Credential {
            access_token: self.access_token,
            token_type,
            refresh_token: self.refresh_token.or(previous_refresh),
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| obtained_at + Duration::seconds(secs)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub currently_playing_type: Option<String>,
    #[serde(default)]
    pub item: Option<PlayingItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayingItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_local: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayingTrack {
    pub id: String,
    pub name: String,
}

/// Point-in-time snapshot of the user's player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Nothing,
    Playing(PlayingTrack),
}

impl From<Option<CurrentlyPlayingResponse>> for PlaybackState {
    fn from(response: Option<CurrentlyPlayingResponse>) -> Self {
        let Some(item) = response.and_then(|r| r.item) else {
            return PlaybackState::Nothing;
        };

        match item.id {
            Some(id) if !id.is_empty() && !item.is_local => PlaybackState::Playing(PlayingTrack {
                id,
                name: item.name,
            }),
            _ => PlaybackState::Nothing,
        }
    }
}

/// Final answer of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikedStatus {
    pub track_id: Option<String>,
    pub liked: bool,
}

impl LikedStatus {
    pub fn nothing_playing() -> Self {
        Self {
            track_id: None,
            liked: false,
        }
    }

    pub fn for_track(track_id: String, liked: bool) -> Self {
        Self {
            track_id: Some(track_id),
            liked,
        }
    }
}

impl fmt::Display for LikedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.liked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cached_token_document() {
        let json = r#"{
            "access_token": "BQD-access",
            "token_type": "Bearer",
            "refresh_token": "AQB-refresh",
            "expiry": "2030-01-02T03:04:05.123456+01:00"
        }"#;
        let credential: Credential = serde_json::from_str(json).unwrap();
        assert_eq!(credential.access_token, "BQD-access");
        assert_eq!(credential.refresh_token.as_deref(), Some("AQB-refresh"));
        assert!(!credential.is_expired());
        assert!(credential.can_refresh());
    }

    #[test]
    fn expiry_has_a_safety_margin() {
        let now = Utc::now();
        let credential = Credential {
            access_token: "a".to_string(),
            expiry: Some(now + Duration::seconds(5)),
            ..Default::default()
        };
        assert!(credential.is_expired_at(now));
        assert!(!credential.is_expired_at(now - Duration::seconds(60)));

        let no_expiry = Credential {
            access_token: "a".to_string(),
            ..Default::default()
        };
        assert!(!no_expiry.is_expired());

        let zero: Credential = serde_json::from_str(
            r#"{"access_token":"a","token_type":"Bearer","expiry":"0001-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(zero.expiry.is_some());
        assert!(!zero.is_expired());
    }

    #[test]
    fn token_response_keeps_previous_refresh_token() {
        let response = TokenResponse {
            access_token: "new".to_string(),
            token_type: String::new(),
            scope: None,
            expires_in: Some(3600),
            refresh_token: None,
        };
        let credential = response.into_credential(Some("old-refresh".to_string()));
        assert_eq!(credential.refresh_token.as_deref(), Some("old-refresh"));
        assert_eq!(credential.token_type, "Bearer");
        assert!(credential.expiry.is_some());
    }

    #[test]
    fn playback_without_item_is_nothing() {
        let empty = CurrentlyPlayingResponse {
            is_playing: true,
            currently_playing_type: Some("unknown".to_string()),
            item: None,
        };
        assert_eq!(PlaybackState::from(Some(empty)), PlaybackState::Nothing);
        assert_eq!(PlaybackState::from(None), PlaybackState::Nothing);
    }

    #[test]
    fn local_file_is_treated_as_nothing() {
        let local = CurrentlyPlayingResponse {
            is_playing: true,
            currently_playing_type: Some("track".to_string()),
            item: Some(PlayingItem {
                id: None,
                name: "demo.mp3".to_string(),
                kind: Some("track".to_string()),
                is_local: true,
            }),
        };
        assert_eq!(PlaybackState::from(Some(local)), PlaybackState::Nothing);
    }

    #[test]
    fn liked_status_displays_bare_boolean() {
        assert_eq!(LikedStatus::for_track("id".to_string(), true).to_string(), "true");
        assert_eq!(LikedStatus::nothing_playing().to_string(), "false");
    }
}
