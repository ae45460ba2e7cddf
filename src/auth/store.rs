//! Token persistence.
//!
//! A store holds at most one access token and one refresh token. Writers do
//! not coordinate beyond the store's own lock, so concurrent refreshes resolve
//! as last-writer-wins.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};

/// Key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "authToken";
/// Key under which the refresh token is persisted.
pub const REFRESH_TOKEN_KEY: &str = "authRefreshToken";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("token store file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>, StoreError>;
    async fn refresh_token(&self) -> Result<Option<String>, StoreError>;
    async fn set_access_token(&self, token: &str) -> Result<(), StoreError>;
    async fn set_refresh_token(&self, token: &str) -> Result<(), StoreError>;
    async fn clear_access_token(&self) -> Result<(), StoreError>;
    async fn clear_refresh_token(&self) -> Result<(), StoreError>;

    /// Drop both tokens.
    async fn clear(&self) -> Result<(), StoreError> {
        self.clear_access_token().await?;
        self.clear_refresh_token().await
    }
}

#[derive(Debug, Default, Clone)]
struct TokenSlots {
    access: Option<String>,
    refresh: Option<String>,
}

/// Process-local store, used by tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slots: RwLock<TokenSlots>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        Self {
            slots: RwLock::new(TokenSlots {
                access: access.map(str::to_string),
                refresh: refresh.map(str::to_string),
            }),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn access_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slots.read().await.access.clone())
    }

    async fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slots.read().await.refresh.clone())
    }

    async fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        self.slots.write().await.access = Some(token.to_string());
        Ok(())
    }

    async fn set_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        self.slots.write().await.refresh = Some(token.to_string());
        Ok(())
    }

    async fn clear_access_token(&self) -> Result<(), StoreError> {
        self.slots.write().await.access = None;
        Ok(())
    }

    async fn clear_refresh_token(&self) -> Result<(), StoreError> {
        self.slots.write().await.refresh = None;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slots.write().await = TokenSlots::default();
        Ok(())
    }
}

/// JSON key-value file keyed by [`ACCESS_TOKEN_KEY`] and [`REFRESH_TOKEN_KEY`].
///
/// A missing file or key reads as "no token". Unknown keys are preserved on
/// write. Updates go through a sibling temp file and a rename.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let rendered = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, &rendered)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load().await?.remove(key))
    }

    async fn update<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        apply(&mut entries);
        self.persist(&entries).await
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Write `contents` to a fresh file readable by its owner only.
async fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    // A leftover temp file would keep its old mode.
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.get(ACCESS_TOKEN_KEY).await
    }

    async fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        self.get(REFRESH_TOKEN_KEY).await
    }

    async fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        let token = token.to_string();
        self.update(move |entries| {
            entries.insert(ACCESS_TOKEN_KEY.to_string(), token);
        })
        .await
    }

    async fn set_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let token = token.to_string();
        self.update(move |entries| {
            entries.insert(REFRESH_TOKEN_KEY.to_string(), token);
        })
        .await
    }

    async fn clear_access_token(&self) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(ACCESS_TOKEN_KEY);
        })
        .await
    }

    async fn clear_refresh_token(&self) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(REFRESH_TOKEN_KEY);
        })
        .await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(ACCESS_TOKEN_KEY);
            entries.remove(REFRESH_TOKEN_KEY);
        })
        .await
    }
}
