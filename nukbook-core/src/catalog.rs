//! Books, authors, recommendations, reviews and search
//!
//! Read-only catalog calls are plain [`ApiClient`] methods. The two places
//! where the user changes something from a catalog page, liking an author and
//! reviewing a book, get small state holders: [`AuthorLike`] flips the heart
//! before the server answers, [`ReviewForm`] keeps the status line and the
//! notices of the review editor.

use crate::client::{with_query, ApiClient, Auth, Method, NO_BODY};
use crate::error::{NukbookError, Result};
use crate::notice::{Notice, NoticeBus};
use crate::optimistic::commit;
use crate::types::{
    Author, Book, Id, LikeState, ReadingStatusEntry, RecommendationSection, Review, SearchResults,
    SimilarBook, TopAuthor,
};
use serde::Serialize;

/// Default page size of `/books` and `/authors`
pub const CATALOG_PAGE_SIZE: u32 = 20;

/// `q`, `limit` and `offset` of a catalog listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            q: None,
            limit: CATALOG_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl CatalogQuery {
    pub fn matching(q: &str) -> Self {
        let q = q.trim();
        Self {
            q: (!q.is_empty()).then(|| q.to_string()),
            ..Self::default()
        }
    }

    fn to_path(&self, base: &str) -> String {
        with_query(
            base,
            &[
                ("q", self.q.clone()),
                ("limit", Some(self.limit.to_string())),
                ("offset", Some(self.offset.to_string())),
            ],
        )
    }
}

/// Body of `POST /books/{id}/reviews`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub body: Option<String>,
}

impl ReviewDraft {
    /// Rating must be 1 to 5; a blank body is sent as `null`
    pub fn new(rating: u8, body: &str) -> std::result::Result<Self, String> {
        if !(1..=5).contains(&rating) {
            return Err("Rating must be between 1 and 5.".to_string());
        }
        let body = body.trim();
        Ok(Self {
            rating,
            body: (!body.is_empty()).then(|| body.to_string()),
        })
    }
}

impl ApiClient {
    pub async fn books(&self, query: &CatalogQuery) -> Result<Vec<Book>> {
        self.get(&query.to_path("/books"), Auth::Optional).await
    }

    pub async fn book(&self, id: Id) -> Result<Book> {
        self.get(&format!("/books/{}", id), Auth::Optional).await
    }

    pub async fn similar_books(&self, id: Id, limit: u32) -> Result<Vec<SimilarBook>> {
        let path = with_query(
            &format!("/books/{}/similar", id),
            &[("limit", Some(limit.to_string()))],
        );
        self.get(&path, Auth::Optional).await
    }

    pub async fn authors(&self, query: &CatalogQuery) -> Result<Vec<Author>> {
        self.get(&query.to_path("/authors"), Auth::Optional).await
    }

    /// Most liked authors first
    pub async fn top_authors(&self, limit: u32) -> Result<Vec<TopAuthor>> {
        let path = with_query("/authors/top", &[("limit", Some(limit.to_string()))]);
        self.get(&path, Auth::Optional).await
    }

    pub async fn author(&self, id: Id) -> Result<Author> {
        self.get(&format!("/authors/{}", id), Auth::Optional).await
    }

    pub async fn author_books(&self, id: Id) -> Result<Vec<Book>> {
        self.get(&format!("/authors/{}/books", id), Auth::Optional)
            .await
    }

    pub async fn author_liked(&self, id: Id) -> Result<bool> {
        let state: LikeState = self
            .get(&format!("/authors/{}/liked", id), Auth::Required)
            .await?;
        Ok(state.liked)
    }

    /// Returns the state the server settled on
    pub async fn set_author_liked(&self, id: Id, liked: bool) -> Result<bool> {
        let state: LikeState = self
            .send(
                Method::POST,
                &format!("/authors/{}/liked", id),
                Some(&LikeState { liked }),
                Auth::Required,
            )
            .await?;
        Ok(state.liked)
    }

    pub async fn recommendations(&self, limit: u32, offset: u32) -> Result<Vec<Book>> {
        let path = with_query(
            "/me/recommendations",
            &[
                ("limit", Some(limit.to_string())),
                ("offset", Some(offset.to_string())),
            ],
        );
        self.get(&path, Auth::Required).await
    }

    /// "Because you liked X" blocks: `sections` seeds, `per` books each
    pub async fn recommendation_sections(
        &self,
        sections: u32,
        per: u32,
    ) -> Result<Vec<RecommendationSection>> {
        let path = with_query(
            "/me/recommendations/sections",
            &[
                ("sections", Some(sections.to_string())),
                ("per", Some(per.to_string())),
            ],
        );
        self.get(&path, Auth::Required).await
    }

    /// My reading statuses, most recently changed first
    pub async fn timeline(&self) -> Result<Vec<ReadingStatusEntry>> {
        self.get("/me/timeline", Auth::Required).await
    }

    pub async fn reviews(&self, book_id: Id) -> Result<Vec<Review>> {
        self.get(&format!("/books/{}/reviews", book_id), Auth::Optional)
            .await
    }

    /// Create or replace my review of the book
    pub async fn save_review(&self, book_id: Id, draft: &ReviewDraft) -> Result<Review> {
        self.send(
            Method::POST,
            &format!("/books/{}/reviews", book_id),
            Some(draft),
            Auth::Required,
        )
        .await
    }

    pub async fn delete_review(&self, book_id: Id) -> Result<()> {
        self.send_empty(
            Method::DELETE,
            &format!("/books/{}/reviews/me", book_id),
            NO_BODY,
            Auth::Required,
        )
        .await
    }

    /// Books, authors and users matching `query`; `@name` searches users only
    pub async fn search(&self, query: &str, limit: u32) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }
        let path = with_query(
            "/search",
            &[
                ("q", Some(query.to_string())),
                ("limit", Some(limit.to_string())),
            ],
        );
        self.get(&path, Auth::Optional).await
    }
}

/// Like button of an author page
///
/// `liked` is `None` while logged out; the button is hidden then.
pub struct AuthorLike {
    client: ApiClient,
    author_id: Id,
    liked: Option<bool>,
}

impl AuthorLike {
    /// Fetch the current state; a failed fetch shows the author as not liked
    pub async fn load(client: ApiClient, author_id: Id) -> Self {
        let liked = if client.tokens().is_logged_in().await {
            match client.author_liked(author_id).await {
                Ok(liked) => Some(liked),
                Err(e) => {
                    tracing::warn!(author_id, "Failed to load like state: {}", e);
                    Some(false)
                }
            }
        } else {
            None
        };
        Self {
            client,
            author_id,
            liked,
        }
    }

    pub fn author_id(&self) -> Id {
        self.author_id
    }

    pub fn liked(&self) -> Option<bool> {
        self.liked
    }

    /// Flip the heart now, put it back if the server refuses
    pub async fn toggle(&mut self) -> Result<bool> {
        let current = self.liked.ok_or(NukbookError::MissingToken)?;
        let next = !current;
        let mut shown = current;
        let settled = commit(
            &mut shown,
            next,
            self.client.set_author_liked(self.author_id, next),
        )
        .await;
        self.liked = Some(shown);

        let settled = settled?;
        self.liked = Some(settled);
        Ok(settled)
    }
}

/// Review editor of a book page
pub struct ReviewForm {
    client: ApiClient,
    notices: NoticeBus,
    book_id: Id,
    status: Option<String>,
}

impl ReviewForm {
    pub fn new(client: ApiClient, notices: NoticeBus, book_id: Id) -> Self {
        Self {
            client,
            notices,
            book_id,
            status: None,
        }
    }

    /// Line shown under the form
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub async fn submit(&mut self, rating: u8, body: &str) -> Result<Review> {
        self.status = None;
        if !self.client.tokens().is_logged_in().await {
            self.status = Some("You must be logged in to review.".to_string());
            return Err(NukbookError::MissingToken);
        }
        let draft = ReviewDraft::new(rating, body).map_err(|message| {
            self.status = Some(message.clone());
            NukbookError::Invalid(message)
        })?;

        match self.client.save_review(self.book_id, &draft).await {
            Ok(review) => {
                tracing::info!(book_id = self.book_id, rating, "Review saved");
                self.status = Some("Saved!".to_string());
                self.notices.push(Notice::success("Review saved."));
                Ok(review)
            }
            Err(e) => {
                self.status = Some(e.to_string());
                self.notices.push(Notice::error("Failed to save review."));
                Err(e)
            }
        }
    }

    pub async fn remove(&mut self) -> Result<()> {
        self.status = None;
        match self.client.delete_review(self.book_id).await {
            Ok(()) => {
                self.notices.push(Notice::info("Review deleted."));
                Ok(())
            }
            Err(e) => {
                self.status = Some(e.to_string());
                self.notices.push(Notice::error("Failed to delete review."));
                Err(e)
            }
        }
    }
}
