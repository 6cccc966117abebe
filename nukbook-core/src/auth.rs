//! Session token store
//!
//! The bearer token lives in the persistent key/value store under a fixed key.
//! It is read from storage once, cached for the rest of the session, and
//! dropped on logout or whenever the API answers 401.

use crate::error::{NukbookError, Result};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "nukbook_access_token";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cached {
    Unloaded,
    Loaded(Option<String>),
}

struct Inner {
    store: Arc<dyn KeyValueStore>,
    cached: RwLock<Cached>,
}

/// Shared handle to the session token
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<Inner>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                cached: RwLock::new(Cached::Unloaded),
            }),
        }
    }

    /// Current token, loading it from storage on first use
    ///
    /// Storage failures read as "no token".
    pub async fn get(&self) -> Option<String> {
        if let Cached::Loaded(token) = &*self.inner.cached.read().await {
            return token.clone();
        }

        let mut cached = self.inner.cached.write().await;
        if let Cached::Loaded(token) = &*cached {
            return token.clone();
        }

        let token = match self.inner.store.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        };
        *cached = Cached::Loaded(token.clone());
        token
    }

    /// Token or the `NO_TOKEN` error
    pub async fn require(&self) -> Result<String> {
        self.get().await.ok_or(NukbookError::MissingToken)
    }

    pub async fn set(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.inner.store.set(TOKEN_KEY, token.clone()).await?;
        *self.inner.cached.write().await = Cached::Loaded(Some(token));
        Ok(())
    }

    /// Forget the token; the cache is cleared even if storage fails
    pub async fn clear(&self) {
        *self.inner.cached.write().await = Cached::Loaded(None);
        if let Err(e) = self.inner.store.remove(TOKEN_KEY).await {
            tracing::warn!("Failed to remove session token: {}", e);
        }
    }

    pub async fn is_logged_in(&self) -> bool {
        self.get().await.is_some()
    }
}
