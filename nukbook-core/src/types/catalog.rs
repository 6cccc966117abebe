//! Books, authors, taxonomy, reviews and search results

use super::Id;
use serde::{Deserialize, Serialize};

/// A book as returned by `/books`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub rating_avg: Option<f64>,
    #[serde(default)]
    pub rating_count: u32,
}

impl Book {
    /// Author names joined for display, `None` when the book has no authors
    pub fn author_line(&self) -> Option<String> {
        if self.authors.is_empty() {
            None
        } else {
            Some(
                self.authors
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        }
    }
}

/// Entry of `/books/{id}/similar`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarBook {
    pub book: Book,
    /// "Same author", "Same genre", "Similar tags", "Highly rated"
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Minimal book reference embedded in other payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRef {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
}

/// Full author record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Author reference embedded in books
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorRef {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Entry of `/authors/top`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopAuthor {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub likes_count: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: Id,
    pub name: String,
}

/// A review of a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: Id,
    pub user_id: Id,
    pub user: super::UserRef,
    pub book_id: Id,
    pub rating: u8,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_hidden: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Entry of the reading timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingStatusEntry {
    pub id: Id,
    pub status: super::ReadingStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    pub updated_at: String,
    pub book: BookRef,
}

/// One "because you liked X" block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationSection {
    pub seed: Book,
    pub items: Vec<Book>,
}

/// Paginated admin listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchAuthor {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchBook {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub authors: Vec<SearchAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchUser {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Answer of `/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResults {
    #[serde(default)]
    pub books: Vec<SearchBook>,
    #[serde(default)]
    pub authors: Vec<SearchAuthor>,
    #[serde(default)]
    pub users: Vec<SearchUser>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.authors.is_empty() && self.users.is_empty()
    }
}
