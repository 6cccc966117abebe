//! Admin back office: paginated tables with create, edit, delete and uploads
//!
//! Each resource (authors, books, tags, genres, users, reviews) describes its
//! REST collection through [`AdminResource`] and opts into the operations it
//! supports with [`Creatable`], [`Editable`], [`Deletable`] and [`WithMedia`].
//! [`AdminTable`] holds the rows of one admin page and applies the edits the
//! same way for all of them.

mod resources;
mod table;

pub use resources::{
    AdminAuthor, AdminBook, AdminReview, AdminUser, AuthorDraft, BookDraft, NameDraft,
    ReviewBook, ReviewUser, Role, UserPatch,
};
pub use table::{AdminFailure, AdminTable};

use crate::client::{with_query, ApiClient, Auth, Method, Upload, NO_BODY};
use crate::error::Result;
use crate::optimistic::Keyed;
use crate::types::{Id, Page};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Rows per admin page
pub const ADMIN_PAGE_SIZE: u32 = 50;

/// A REST collection under `/admin`
pub trait AdminResource: Clone + Keyed + DeserializeOwned + Send + Sync + 'static {
    /// Collection path, e.g. `/admin/authors`
    const PATH: &'static str;
    /// Page the login screen returns to
    const PAGE: &'static str;
}

pub trait Creatable: AdminResource {
    type Draft: Serialize + Send + Sync;

    /// Message to show instead of sending an invalid draft
    fn check(_draft: &Self::Draft) -> std::result::Result<(), String> {
        Ok(())
    }
}

pub trait Editable: AdminResource {
    type Patch: Serialize + Send + Sync;

    fn check_patch(_patch: &Self::Patch) -> std::result::Result<(), String> {
        Ok(())
    }
}

pub trait Deletable: AdminResource {
    /// A row that is already gone counts as deleted
    const IGNORE_NOT_FOUND: bool = false;
}

/// Resources with one uploadable image
pub trait WithMedia: AdminResource {
    /// Last path segment of the upload endpoint (`photo`, `cover`)
    const MEDIA: &'static str;

    fn set_media_url(&mut self, url: Option<String>);
}

/// `q`, `limit` and `offset` of an admin listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub q: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            q: None,
            limit: ADMIN_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl ListQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self::default().with_filter(&q.into())
    }

    /// Blank filters are dropped from the request
    pub fn with_filter(mut self, q: &str) -> Self {
        let q = q.trim();
        self.q = (!q.is_empty()).then(|| q.to_string());
        self
    }

    pub fn to_path(&self, base: &str) -> String {
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

/// Answer of a media upload: `{id, photo_url}` or `{id, cover_url}`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MediaUpdate {
    pub id: Id,
    #[serde(default, alias = "photo_url", alias = "cover_url")]
    pub url: Option<String>,
}

impl ApiClient {
    pub async fn admin_list<R: AdminResource>(&self, query: &ListQuery) -> Result<Page<R>> {
        self.get(&query.to_path(R::PATH), Auth::Required).await
    }

    pub async fn admin_create<R: Creatable>(&self, draft: &R::Draft) -> Result<R> {
        self.send(Method::POST, R::PATH, Some(draft), Auth::Required)
            .await
    }

    pub async fn admin_update<R: Editable>(&self, id: Id, patch: &R::Patch) -> Result<R> {
        let path = format!("{}/{}", R::PATH, id);
        self.send(Method::PATCH, &path, Some(patch), Auth::Required)
            .await
    }

    pub async fn admin_delete<R: Deletable>(&self, id: Id) -> Result<()> {
        let path = format!("{}/{}", R::PATH, id);
        self.send_empty(Method::DELETE, &path, NO_BODY, Auth::Required)
            .await
    }

    pub async fn admin_upload<R: WithMedia>(&self, id: Id, upload: Upload) -> Result<MediaUpdate> {
        let path = format!("{}/{}/{}", R::PATH, id, R::MEDIA);
        self.upload(&path, upload).await
    }
}
