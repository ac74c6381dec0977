use std::{
    fs::{File, OpenOptions},
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use fs2::FileExt;

use crate::{LikedError, debug, types::Credential, warning};

/// On-disk cache for the single OAuth credential of this user.
///
/// Every read or write is expected to happen while a [`CredentialLock`]
/// obtained from [`CredentialStore::acquire_lock`] is alive.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    lock_path: PathBuf,
}

/// Exclusive advisory lock on the credential cache.
///
/// Released when dropped.
#[derive(Debug)]
pub struct CredentialLock {
    file: File,
    path: PathBuf,
}

impl Drop for CredentialLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warning!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}

impl CredentialStore {
    /// Store for the credential at `path`. The lock lives next to it as
    /// `<name>.lock`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = Self::lock_path_for(&path);
        CredentialStore { path, lock_path }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Takes the lock without waiting.
    ///
    /// # Errors
    ///
    /// [`LikedError::LockContention`] if another process holds the lock, or
    /// [`LikedError::LockFile`] if the lock file cannot be opened.
    pub fn acquire_lock(&self) -> Result<CredentialLock, LikedError> {
        if let Some(parent) = self.lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| LikedError::LockFile {
                    path: self.lock_path.clone(),
                    source,
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|source| LikedError::LockFile {
                path: self.lock_path.clone(),
                source,
            })?;

        file.try_lock_exclusive()
            .map_err(|source| self.lock_error(source))?;

        debug!("Acquired lock {}", self.lock_path.display());
        Ok(CredentialLock {
            file,
            path: self.lock_path.clone(),
        })
    }

    /// Reads the cached credential.
    ///
    /// A missing file or unparsable content yields an empty credential.
    ///
    /// # Errors
    ///
    /// [`LikedError::CredentialRead`] for any other read failure.
    pub async fn load(&self) -> Result<Credential, LikedError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No saved credential at {}", self.path.display());
                return Ok(Credential::default());
            }
            Err(source) => {
                return Err(LikedError::CredentialRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_str::<Credential>(&content) {
            Ok(credential) => Ok(credential),
            Err(e) => {
                warning!(
                    "Ignoring malformed credential file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Credential::default())
            }
        }
    }

    /// Overwrites the cached credential.
    pub async fn save(&self, credential: &Credential) -> Result<(), LikedError> {
        let write_err = |source| LikedError::CredentialWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }

        let json = serde_json::to_string_pretty(credential)
            .map_err(|e| write_err(io::Error::new(ErrorKind::InvalidData, e)))?;
        async_fs::write(&self.path, json).await.map_err(write_err)
    }

    /// Only a lock held elsewhere is contention. Anything else (`ENOLCK` on
    /// network filesystems, a bad descriptor) is reported as is.
    fn lock_error(&self, source: io::Error) -> LikedError {
        if source.kind() == fs2::lock_contended_error().kind() {
            LikedError::LockContention(self.path.clone())
        } else {
            LikedError::LockFile {
                path: self.lock_path.clone(),
                source,
            }
        }
    }

    fn lock_path_for(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| crate::config::CREDENTIAL_FILE.into());
        name.push(".lock");
        path.with_file_name(name)
    }
}
