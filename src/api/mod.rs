//! # API Module
//!
//! HTTP handlers served by the local OAuth callback listener.
//!
//! - [`callback`] - completes the authorization code flow: checks the
//!   anti-forgery `state`, exchanges the `code` and hands the resulting
//!   client to the coordinator.
//! - [`fallback`] - catch-all that logs any other request (favicon requests,
//!   stray browser requests) and answers `404`.
//!
//! Both handlers share a [`CallbackState`] holding the OAuth client and the
//! senders of the two hand-off channels.

mod callback;
mod fallback;

pub use callback::{CallbackState, LOGIN_PAGE_HTML, callback};
pub use fallback::fallback;
