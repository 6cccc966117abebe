//! Global navigation search

use super::{LookupSource, RecentItem, RecentKind};
use crate::client::ApiClient;
use crate::error::Result;
use crate::types::SearchResults;
use async_trait::async_trait;

/// Results per category
pub const SEARCH_LIMIT: u32 = 5;

/// `/search` as a lookup source
///
/// A query starting with `@` is a user search: only the users of the answer
/// are kept, and a bare `@` is answered locally with nothing.
pub struct SearchSource {
    client: ApiClient,
    limit: u32,
}

impl SearchSource {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            limit: SEARCH_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl LookupSource for SearchSource {
    type Output = SearchResults;

    async fn lookup(&self, query: &str) -> Result<SearchResults> {
        let mut results = self.client.search(query, self.limit).await?;
        if query.starts_with('@') {
            results.books.clear();
            results.authors.clear();
        }
        Ok(results)
    }

    fn immediate(&self, query: &str) -> Option<SearchResults> {
        (query == "@").then(SearchResults::default)
    }
}

/// Selectable items in display order: books, authors, users
pub fn flatten_results(results: &SearchResults) -> Vec<RecentItem> {
    let books = results.books.iter().map(|b| RecentItem {
        kind: RecentKind::Book,
        id: b.id,
        label: b.title.clone(),
        href: format!("/books/{}", b.id),
        image_url: b.cover_url.clone(),
        sublabel: if b.authors.is_empty() {
            None
        } else {
            Some(
                b.authors
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        },
    });

    let authors = results.authors.iter().map(|a| RecentItem {
        kind: RecentKind::Author,
        id: a.id,
        label: a.name.clone(),
        href: format!("/authors/{}", a.id),
        image_url: a.photo_url.clone(),
        sublabel: None,
    });

    let users = results.users.iter().map(|u| RecentItem {
        kind: RecentKind::User,
        id: u.id,
        label: format!("@{}", u.username),
        href: format!("/users/{}", u.id),
        image_url: u.avatar_url.clone(),
        sublabel: None,
    });

    books.chain(authors).chain(users).collect()
}
