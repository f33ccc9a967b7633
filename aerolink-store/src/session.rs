use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use tokio::fs;

use aerolink_shared::AuthData;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session entry is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Refusing to persist invalid session: {0}")]
    InvalidSession(String),
}

/// Key-value persistence for the single session entry.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, auth: &AuthData) -> Result<(), StoreError>;
    async fn load(&self) -> Result<Option<AuthData>, StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

/// File-backed store: one JSON document at a configured path, surviving
/// process restarts the way localStorage survives reloads.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, auth: &AuthData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(auth)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<AuthData>, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let auth: AuthData = serde_json::from_str(&raw)?;
        Ok(Some(auth))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    entry: Mutex<Option<AuthData>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, auth: &AuthData) -> Result<(), StoreError> {
        *self.entry.lock().unwrap() = Some(auth.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<AuthData>, StoreError> {
        Ok(self.entry.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.entry.lock().unwrap() = None;
        Ok(())
    }
}

/// Session state shared across the client: a persistent store plus an
/// in-memory copy of the current entry.
///
/// Construction and teardown are tied to login/logout; components receive an
/// `Arc<SessionManager>` explicitly rather than reading ambient globals.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<AuthData>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// Persist a new session. The token must look like a three-part JWT;
    /// anything else violates the session invariant and is refused.
    pub async fn save(&self, auth: AuthData) -> Result<(), StoreError> {
        if !auth.has_well_formed_token() {
            return Err(StoreError::InvalidSession(
                "token is not a three-part JWT-like string".to_string(),
            ));
        }
        self.store.save(&auth).await?;
        *self.current.write().unwrap() = Some(auth);
        Ok(())
    }

    /// Load the persisted entry into memory. Entries missing required
    /// fields, carrying a malformed token, or failing to parse are cleared
    /// and reported as unauthenticated rather than surfaced as errors.
    pub async fn load(&self) -> Result<Option<AuthData>, StoreError> {
        let loaded = match self.store.load().await {
            Ok(loaded) => loaded,
            Err(StoreError::Serialization(err)) => {
                tracing::warn!("Discarding unreadable session entry: {}", err);
                self.store.clear().await?;
                None
            }
            Err(err) => return Err(err),
        };

        let valid = match loaded {
            Some(auth) if auth.email.is_empty() || !auth.has_well_formed_token() => {
                tracing::warn!("Discarding session entry with invalid fields");
                self.store.clear().await?;
                None
            }
            other => other,
        };

        *self.current.write().unwrap() = valid.clone();
        Ok(valid)
    }

    /// Drop the session everywhere: persistent entry and in-memory copy.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.clear().await?;
        *self.current.write().unwrap() = None;
        Ok(())
    }

    pub fn current(&self) -> Option<AuthData> {
        self.current.read().unwrap().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap()
            .as_ref()
            .map(|a| a.token.as_str().to_string())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().unwrap().is_some()
    }

    pub fn current_email(&self) -> Option<String> {
        self.current.read().unwrap().as_ref().map(|a| a.email.clone())
    }
}
