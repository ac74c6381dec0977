use crate::{
    LikedError, debug,
    error::Severity,
    info,
    management::CredentialStore,
    spotify::SpotifyClient,
    types::{Credential, LikedStatus, PlaybackState},
    warning,
};

/// Answers whether the currently playing track is in the user's library.
///
/// Writes the client's credential back to `store` first if it differs from
/// `loaded`, the credential read at startup. Nothing playing yields `false`
/// without touching the library.
///
/// # Errors
///
/// [`LikedError::SavedTracks`] if the library lookup fails. A credential
/// that cannot be written back only degrades the run and is logged.
pub async fn resolve(
    mut client: SpotifyClient,
    loaded: &Credential,
    store: &CredentialStore,
) -> Result<LikedStatus, LikedError> {
    if let Err(e) = client.refresh_if_expired().await {
        warning!("Failed to refresh token: {}", e);
    }
    persist_if_changed(client.credential(), loaded, store).await?;

    let track = match client.currently_playing().await {
        Ok(PlaybackState::Playing(track)) => track,
        Ok(PlaybackState::Nothing) => {
            // Spotify sometimes reports no content during active playback.
            info!("Nothing is currently playing");
            return Ok(LikedStatus::nothing_playing());
        }
        Err(e) => {
            warning!("Error getting currently playing item: {}", e);
            return Ok(LikedStatus::nothing_playing());
        }
    };

    debug!("Checking library for {} ({})", track.name, track.id);
    let liked = client
        .has_saved_track(&track.id)
        .await
        .map_err(LikedError::SavedTracks)?;

    Ok(LikedStatus::for_track(track.id, liked))
}

async fn persist_if_changed(
    current: &Credential,
    loaded: &Credential,
    store: &CredentialStore,
) -> Result<(), LikedError> {
    if current == loaded || current.is_empty() {
        return Ok(());
    }

    info!("Updating saved token");
    match store.save(current).await {
        Ok(()) => Ok(()),
        Err(e) if e.severity() == Severity::Fatal => Err(e),
        Err(e) => {
            warning!("{}; the next run will validate again", e);
            Ok(())
        }
    }
}
