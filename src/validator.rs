use std::sync::Arc;

use crate::{
    LikedError, debug, info,
    spotify::{OAuth, SpotifyClient},
    types::{Credential, PlaybackState},
    warning,
};

/// Result of checking the cached credential.
#[derive(Debug)]
pub enum Validation {
    Valid(SpotifyClient),
    Invalid(LikedError),
}

/// Checks whether `credential` still works.
///
/// One `GET /me` decides; there is no retry. A valid client is returned even
/// if the follow-up playback lookup fails, since that lookup only feeds the
/// log.
pub async fn validate(oauth: Arc<OAuth>, credential: Credential) -> Validation {
    if credential.is_empty() {
        info!("No saved token, starting browser login");
        return Validation::Invalid(LikedError::InvalidCredential(
            "no saved token".to_string(),
        ));
    }

    let mut client = SpotifyClient::new(oauth, credential);
    let user = match client.current_user().await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warning!("Saved token didn't resolve a user; log in again in the browser");
            return Validation::Invalid(LikedError::InvalidCredential(
                "no user for saved token".to_string(),
            ));
        }
        Err(e) => {
            warning!("Saved token didn't work ({}); log in again in the browser", e);
            return Validation::Invalid(LikedError::Api(e));
        }
    };
    debug!("Saved token belongs to {}", user.id);

    match client.currently_playing().await {
        Ok(PlaybackState::Nothing) => info!("User is probably not playing anything"),
        Ok(PlaybackState::Playing(track)) => debug!("User is playing {}", track.name),
        Err(e) => debug!("Playback check failed: {}", e),
    }

    Validation::Valid(client)
}
