//! Notification bell: unseen counts and a preview of the latest items
//!
//! Counts are `None` when unknown (logged out, or the last request failed);
//! the badge is hidden then. Views watch the counts through a `watch`
//! channel so a background poller can refresh them.

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{NotificationCounts, NotificationPreview};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

struct Inner {
    client: ApiClient,
    counts: watch::Sender<Option<NotificationCounts>>,
    preview: RwLock<NotificationPreview>,
}

#[derive(Clone)]
pub struct NotificationBell {
    inner: Arc<Inner>,
}

impl NotificationBell {
    pub fn new(client: ApiClient) -> Self {
        let (counts, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                client,
                counts,
                preview: RwLock::new(NotificationPreview::default()),
            }),
        }
    }

    pub fn counts(&self) -> Option<NotificationCounts> {
        *self.inner.counts.borrow()
    }

    /// Number on the badge, `None` when there is nothing to show
    pub fn badge(&self) -> Option<u32> {
        self.counts().map(|c| c.total()).filter(|n| *n > 0)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<NotificationCounts>> {
        self.inner.counts.subscribe()
    }

    pub async fn preview(&self) -> NotificationPreview {
        self.inner.preview.read().await.clone()
    }

    /// Fetch counts, then the preview; any failure makes the counts unknown
    pub async fn refresh(&self) -> Result<()> {
        match self.fetch().await {
            Ok((counts, preview)) => {
                self.inner.counts.send_replace(Some(counts));
                *self.inner.preview.write().await = preview;
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Notification refresh failed: {}", e);
                self.inner.counts.send_replace(None);
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> Result<(NotificationCounts, NotificationPreview)> {
        let counts = self.inner.client.notification_counts().await?;
        let preview = self.inner.client.notification_preview().await?;
        Ok((counts, preview))
    }

    /// Opening the dropdown marks everything seen and zeroes the badge
    pub async fn open(&self) -> Result<()> {
        match self.inner.client.mark_notifications_seen().await {
            Ok(()) => {
                self.inner.counts.send_modify(|counts| {
                    if let Some(counts) = counts {
                        *counts = NotificationCounts::default();
                    }
                });
                Ok(())
            }
            Err(e) => {
                self.inner.counts.send_replace(None);
                Err(e)
            }
        }
    }

    /// Refresh every `every` while logged in; abort the handle to stop
    pub fn spawn_poller(&self, every: Duration) -> JoinHandle<()> {
        let bell = self.clone();
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(every);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if !bell.inner.client.tokens().is_logged_in().await {
                    bell.inner.counts.send_replace(None);
                    continue;
                }
                // Failures already reset the counts
                let _ = bell.refresh().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenStore;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_logged_out_refresh_leaves_counts_unknown() {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9"), tokens).unwrap();
        let bell = NotificationBell::new(client);

        assert!(bell.refresh().await.is_err());
        assert_eq!(bell.counts(), None);
        assert_eq!(bell.badge(), None);
    }
}
