use std::{io, net::SocketAddr, path::PathBuf};

use thiserror::Error;

/// How a failure affects the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Drives the run down another valid path (interactive login, `false`).
    Recoverable,
    /// Logged as a warning; the run still produces an answer.
    Degraded,
    /// Ends the run with a non-zero exit status.
    Fatal,
}

#[derive(Debug, Error)]
pub enum LikedError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("credential file {} is locked by another process", .0.display())]
    LockContention(PathBuf),

    #[error("failed to open lock file {}: {source}", .path.display())]
    LockFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read credential file {}: {source}", .path.display())]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write credential file {}: {source}", .path.display())]
    CredentialWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("saved credential is not usable: {0}")]
    InvalidCredential(String),

    #[error("failed to bind callback listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("callback listener stopped: {0}")]
    Serve(#[source] io::Error),

    #[error("state mismatch: {received:?} != {expected}")]
    StateMismatch {
        received: Option<String>,
        expected: String,
    },

    #[error("authorization was denied: {0}")]
    AuthorizationDenied(String),

    #[error("callback did not carry an authorization code")]
    MissingCode,

    #[error("couldn't get token: {0}")]
    TokenExchange(#[source] reqwest::Error),

    #[error("Spotify API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("error checking saved tracks: {0}")]
    SavedTracks(#[source] reqwest::Error),

    #[error("background task failed: {0}")]
    TaskFailed(String),

    #[error("no authenticated client was produced")]
    Aborted,
}

impl LikedError {
    /// Classifies the failure for the component that has to decide what
    /// happens next.
    ///
    /// A saved credential that does not work sends the run to the browser
    /// login. A credential that cannot be written back is only logged.
    /// Everything else ends the run.
    pub fn severity(&self) -> Severity {
        match self {
            LikedError::InvalidCredential(_) | LikedError::Api(_) => Severity::Recoverable,
            LikedError::CredentialWrite { .. } => Severity::Degraded,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
