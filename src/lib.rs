//! Spotify Liked-Track Checker Library
//!
//! This library answers a single question: is the track currently playing on
//! the user's Spotify account saved in their library? It owns the credential
//! lifecycle around that question: reading a cached OAuth token, checking
//! that it still works, falling back to a browser-based authorization code
//! flow when it does not, and handing exactly one authenticated client to the
//! code that computes the answer.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback listener
//! - `config` - Configuration loading from the environment and `.env` files
//! - `coordinator` - Process-lifetime orchestration of the credential race
//! - `error` - Error type and severity classification
//! - `handoff` - Single-slot, first-writer-wins hand-off channel
//! - `launcher` - Interactive browser authorization flow
//! - `logging` - `env_logger` backend and verbosity for the logging macros
//! - `management` - Credential cache on disk
//! - `resolver` - Liked-track lookup for the currently playing item
//! - `server` - Local HTTP listener for OAuth callbacks
//! - `spotify` - Spotify Web API and accounts service client
//! - `types` - Data structures and type definitions
//! - `validator` - Saved-token validation
//!
//! # Example
//!
//! ```
//! use spotify_liked::{config, coordinator};
//!
//! #[tokio::main]
//! async fn main() -> spotify_liked::Res<()> {
//!     config::load_env(None);
//!     let config = config::Config::from_env()?;
//!     let status = coordinator::run(&config).await?;
//!     println!("{}", status);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod handoff;
pub mod launcher;
pub mod logging;
pub mod management;
pub mod resolver;
pub mod server;
pub mod spotify;
pub mod types;
pub mod validator;

pub use error::LikedError;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the thin CLI glue where the concrete error does not matter. The
/// credential and authorization code paths return [`LikedError`] instead so
/// the coordinator can classify failures.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[doc(hidden)]
pub use log as __log;

/// Logs an informational message, shown as a blue bullet point on stderr.
///
/// Shown at `info` verbosity and above. Standard output is reserved for the
/// final answer, so none of the logging macros ever write to it.
///
/// # Example
///
/// ```
/// info!("Saved token is still valid");
/// info!("Currently playing {}", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ($crate::__log::info!($($arg)*))
}

/// Logs a success message, shown with a green checkmark.
///
/// Shown at `info` verbosity and above.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ($crate::__log::info!(target: $crate::logging::SUCCESS_TARGET, $($arg)*))
}

/// Logs an error message, shown with a red exclamation mark.
///
/// Unlike a fatal exit helper this only reports; deciding to terminate the
/// process is left to the binary's entry point.
///
/// # Example
///
/// ```
/// error!("Credential file is locked: {}", path.display());
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ($crate::__log::error!($($arg)*))
}

/// Logs a warning, shown with a yellow exclamation mark.
///
/// Used for degraded-but-continuing conditions such as a browser that could
/// not be launched or a credential that could not be written back.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ($crate::__log::warn!($($arg)*))
}

/// Logs a dimmed diagnostic message at `debug` verbosity.
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ($crate::__log::debug!($($arg)*))
}
