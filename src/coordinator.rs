//! Process-lifetime orchestration.
//!
//! Two paths can produce an authenticated client: the saved credential, once
//! validated, or the browser login completed through the callback listener.
//! Whichever finishes first fills the single-slot client hand-off; the
//! resolver takes exactly that one client and fills the single-slot outcome
//! hand-off, which is what [`run`] waits on.
//!
//! The wait has no timeout. An abandoned browser login keeps the process
//! waiting until it is killed.

use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};

use crate::{
    LikedError,
    api::CallbackState,
    config::Config,
    debug,
    error::Severity,
    handoff::{self, HandoffReceiver, HandoffSender},
    launcher,
    management::CredentialStore,
    resolver, server,
    spotify::{OAuth, SpotifyClient, auth::AUTH_STATE},
    types::{Credential, LikedStatus},
    validator::{self, Validation},
};

type Outcome = Result<LikedStatus, LikedError>;

/// Runs one query from lock acquisition to final answer.
///
/// The credential lock is held for the whole run and released when this
/// function returns, whatever the outcome.
pub async fn run(config: &Config) -> Result<LikedStatus, LikedError> {
    let store = CredentialStore::new(config.credential_path.clone());
    let _lock = store.acquire_lock()?;
    let loaded = store.load().await?;

    let oauth = Arc::new(OAuth::new(config));
    let (client_tx, client_rx) = handoff::channel::<SpotifyClient>();
    let (outcome_tx, outcome_rx) = handoff::channel::<Outcome>();

    // Handlers are in place before either path can produce a client.
    let app = server::router(CallbackState {
        oauth: Arc::clone(&oauth),
        expected_state: AUTH_STATE.to_string(),
        clients: client_tx.clone(),
        outcome: outcome_tx.clone(),
    });

    let mut tasks = JoinSet::new();

    tasks.spawn(resolve_first_client(
        client_rx,
        outcome_tx.clone(),
        loaded.clone(),
        store.clone(),
    ));

    let addr = config.server_addr;
    let open_browser = config.open_browser;
    tasks.spawn(async move {
        match validator::validate(Arc::clone(&oauth), loaded).await {
            Validation::Valid(client) => {
                debug!("Handing off client built from saved token");
                client_tx.offer(client);
            }
            Validation::Invalid(reason) if reason.severity() == Severity::Fatal => {
                outcome_tx.offer(Err(reason));
            }
            Validation::Invalid(reason) => {
                debug!("Falling back to browser login: {}", reason);
                if let Err(e) = launcher::launch(&oauth, addr, app, AUTH_STATE, open_browser).await
                {
                    outcome_tx.offer(Err(e));
                }
            }
        }
    });

    tokio::select! {
        outcome = outcome_rx.take() => outcome.unwrap_or(Err(LikedError::Aborted)),
        err = first_task_failure(&mut tasks) => Err(LikedError::TaskFailed(err.to_string())),
    }
}

async fn resolve_first_client(
    clients: HandoffReceiver<SpotifyClient>,
    outcome: HandoffSender<Outcome>,
    loaded: Credential,
    store: CredentialStore,
) {
    let Some(client) = clients.take().await else {
        return;
    };
    outcome.offer(resolver::resolve(client, &loaded, &store).await);
}

/// Resolves with the first task that panicked; pends forever otherwise.
async fn first_task_failure(tasks: &mut JoinSet<()>) -> JoinError {
    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            return err;
        }
    }
    std::future::pending().await
}
