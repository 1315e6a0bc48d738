//! Persistence of the opaque credential issued by the identity provider.
//!
//! The credential is a single string. It is attached to every request as a bearer token
//! and cleared when the backend answers 401.

use parking_lot::RwLock;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Storage for the bearer credential.
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: String);
    fn clear(&self);

    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

/// Credential kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentials {
    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set_token(&self, token: String) {
        *self.token.write() = Some(token);
    }

    fn clear(&self) {
        *self.token.write() = None;
    }
}

/// Credential persisted as the sole content of a file.
///
/// A missing or blank file means "no credential". I/O failures are logged and treated
/// the same way; the in-memory copy stays authoritative for the running process.
#[derive(Debug)]
pub struct FileCredentials {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl FileCredentials {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = match fs::read_to_string(&path) {
            Ok(raw) => Some(raw.trim().to_string()).filter(|token| !token.is_empty()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read credential");
                None
            }
        };
        debug!(path = %path.display(), present = cached.is_some(), "Credential loaded");
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl CredentialStore for FileCredentials {
    fn token(&self) -> Option<String> {
        self.cached.read().clone()
    }

    fn set_token(&self, token: String) {
        if let Err(e) = fs::write(&self.path, &token) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist credential");
        }
        *self.cached.write() = Some(token);
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove credential"),
        }
        *self.cached.write() = None;
    }
}
