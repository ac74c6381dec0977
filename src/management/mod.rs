mod credential;

pub use credential::CredentialLock;
pub use credential::CredentialStore;
