//! Recently opened search results, persisted across runs

use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::types::Id;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RECENT_KEY: &str = "nukbook_recent_searches";
pub const RECENT_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecentKind {
    Book,
    Author,
    User,
}

/// A selectable search result; also what gets remembered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentItem {
    #[serde(rename = "type")]
    pub kind: RecentKind,
    pub id: Id,
    pub label: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
}

/// Put `item` first, dropping older entries with the same href, capped at the limit
pub fn push_recent(items: &[RecentItem], item: RecentItem) -> Vec<RecentItem> {
    let mut next = Vec::with_capacity(RECENT_LIMIT);
    let href = item.href.clone();
    next.push(item);
    next.extend(items.iter().filter(|r| r.href != href).cloned());
    next.truncate(RECENT_LIMIT);
    next
}

/// The recent list backed by a key/value store
pub struct RecentSearches {
    store: Arc<dyn KeyValueStore>,
    items: Vec<RecentItem>,
}

impl RecentSearches {
    /// Read the saved list; missing or unreadable data gives an empty list
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match store.get(RECENT_KEY).await {
            Ok(Some(raw)) => parse(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read recent searches: {}", e);
                Vec::new()
            }
        };
        Self { store, items }
    }

    pub fn items(&self) -> &[RecentItem] {
        &self.items
    }

    pub async fn record(&mut self, item: RecentItem) -> Result<()> {
        self.items = push_recent(&self.items, item);
        self.save().await
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.save().await
    }

    async fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.items)?;
        self.store.set(RECENT_KEY, raw).await?;
        Ok(())
    }
}

fn parse(raw: &str) -> Vec<RecentItem> {
    match serde_json::from_str::<Vec<RecentItem>>(raw) {
        Ok(mut items) => {
            items.truncate(RECENT_LIMIT);
            items
        }
        Err(e) => {
            tracing::debug!("Ignoring unreadable recent searches: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn item(href: &str) -> RecentItem {
        RecentItem {
            kind: RecentKind::Book,
            id: 1,
            label: href.to_string(),
            href: href.to_string(),
            image_url: None,
            sublabel: None,
        }
    }

    #[test]
    fn test_push_moves_duplicate_to_front() {
        let list = vec![item("/books/1"), item("/books/2")];
        let next = push_recent(&list, item("/books/2"));
        let hrefs: Vec<&str> = next.iter().map(|i| i.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/books/2", "/books/1"]);
    }

    #[tokio::test]
    async fn test_load_tolerates_corrupt_data() {
        let store = Arc::new(MemoryStore::new());
        store.set(RECENT_KEY, "{not json".to_string()).await.unwrap();
        let recent = RecentSearches::load(store).await;
        assert!(recent.items().is_empty());
    }

    #[tokio::test]
    async fn test_record_and_clear_persist() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut recent = RecentSearches::load(store.clone()).await;
        recent.record(item("/users/3")).await.unwrap();

        let reloaded = RecentSearches::load(store.clone()).await;
        assert_eq!(reloaded.items(), &[item("/users/3")]);

        recent.clear().await.unwrap();
        assert_eq!(store.get(RECENT_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_string(&item("/books/1")).unwrap();
        assert_eq!(
            json,
            r#"{"type":"book","id":1,"label":"/books/1","href":"/books/1"}"#
        );
    }

    proptest! {
        #[test]
        fn prop_recent_is_bounded_unique_and_newest_first(
            hrefs in proptest::collection::vec(0u8..12, 0..40)
        ) {
            let mut list: Vec<RecentItem> = Vec::new();
            for h in &hrefs {
                list = push_recent(&list, item(&format!("/books/{}", h)));
                prop_assert!(list.len() <= RECENT_LIMIT);
                prop_assert_eq!(&list[0].href, &format!("/books/{}", h));
            }
            let mut seen = std::collections::HashSet::new();
            for entry in &list {
                prop_assert!(seen.insert(entry.href.clone()));
            }
        }
    }
}
