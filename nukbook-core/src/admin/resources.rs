//! Rows and payloads of the admin collections

use super::{AdminResource, Creatable, Deletable, Editable, WithMedia};
use crate::lookup::PickerOption;
use crate::optimistic::Keyed;
use crate::types::{Genre, Id, Tag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn require_text(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

// Authors

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminAuthor {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of author create and edit
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AuthorDraft {
    pub name: String,
    pub bio: Option<String>,
}

impl AuthorDraft {
    /// Trimmed name, blank bio sent as `null`
    pub fn new(name: &str, bio: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            bio: bio.map(str::trim).filter(|b| !b.is_empty()).map(str::to_string),
        }
    }
}

impl Keyed for AdminAuthor {
    fn key(&self) -> Id {
        self.id
    }
}

impl AdminResource for AdminAuthor {
    const PATH: &'static str = "/admin/authors";
    const PAGE: &'static str = "/admin/authors";
}

impl Creatable for AdminAuthor {
    type Draft = AuthorDraft;

    fn check(draft: &AuthorDraft) -> Result<(), String> {
        require_text(&draft.name, "Name cannot be empty.")
    }
}

impl Editable for AdminAuthor {
    type Patch = AuthorDraft;

    fn check_patch(patch: &AuthorDraft) -> Result<(), String> {
        require_text(&patch.name, "Name cannot be empty.")
    }
}

impl Deletable for AdminAuthor {}

impl WithMedia for AdminAuthor {
    const MEDIA: &'static str = "photo";

    fn set_media_url(&mut self, url: Option<String>) {
        self.photo_url = url;
    }
}

// Books

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminBook {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub authors: Vec<PickerOption>,
    #[serde(default)]
    pub tags: Vec<PickerOption>,
    #[serde(default)]
    pub genres: Vec<PickerOption>,
}

/// Body of book create and edit
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub author_ids: Vec<Id>,
    pub tag_ids: Vec<Id>,
    pub genre_ids: Vec<Id>,
}

impl Keyed for AdminBook {
    fn key(&self) -> Id {
        self.id
    }
}

impl AdminResource for AdminBook {
    const PATH: &'static str = "/admin/books";
    const PAGE: &'static str = "/admin/books";
}

impl Creatable for AdminBook {
    type Draft = BookDraft;

    fn check(draft: &BookDraft) -> Result<(), String> {
        require_text(&draft.title, "Title cannot be empty.")
    }
}

impl Editable for AdminBook {
    type Patch = BookDraft;

    fn check_patch(patch: &BookDraft) -> Result<(), String> {
        require_text(&patch.title, "Title cannot be empty.")
    }
}

impl Deletable for AdminBook {
    const IGNORE_NOT_FOUND: bool = true;
}

impl WithMedia for AdminBook {
    const MEDIA: &'static str = "cover";

    fn set_media_url(&mut self, url: Option<String>) {
        self.cover_url = url;
    }
}

// Tags and genres

/// `{name}` body for tags and genres
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NameDraft {
    pub name: String,
}

impl NameDraft {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }
}

macro_rules! taxonomy_resource {
    ($ty:ty, $path:literal) => {
        impl Keyed for $ty {
            fn key(&self) -> Id {
                self.id
            }
        }

        impl AdminResource for $ty {
            const PATH: &'static str = $path;
            const PAGE: &'static str = "/admin/tags-genres";
        }

        impl Creatable for $ty {
            type Draft = NameDraft;

            fn check(draft: &NameDraft) -> Result<(), String> {
                require_text(&draft.name, "Name cannot be empty.")
            }
        }

        impl Editable for $ty {
            type Patch = NameDraft;

            fn check_patch(patch: &NameDraft) -> Result<(), String> {
                require_text(&patch.name, "Name cannot be empty.")
            }
        }

        impl Deletable for $ty {
            const IGNORE_NOT_FOUND: bool = true;
        }
    };
}

taxonomy_resource!(Tag, "/admin/tags");
taxonomy_resource!(Genre, "/admin/genres");

// Users

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Staff,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Staff, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| format!("'{}' is not a role (user, staff, admin)", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminUser {
    pub id: Id,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Keyed for AdminUser {
    fn key(&self) -> Id {
        self.id
    }
}

impl AdminResource for AdminUser {
    const PATH: &'static str = "/admin/users";
    const PAGE: &'static str = "/admin/users";
}

impl Editable for AdminUser {
    type Patch = UserPatch;

    fn check_patch(patch: &UserPatch) -> Result<(), String> {
        if patch.role.is_none() && patch.is_active.is_none() {
            return Err("Nothing to update.".to_string());
        }
        Ok(())
    }
}

// Reviews

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewBook {
    pub id: Id,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewUser {
    pub id: Id,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminReview {
    pub id: Id,
    pub rating: u8,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub book: ReviewBook,
    pub user: ReviewUser,
}

impl Keyed for AdminReview {
    fn key(&self) -> Id {
        self.id
    }
}

impl AdminResource for AdminReview {
    const PATH: &'static str = "/admin/reviews";
    const PAGE: &'static str = "/admin/reviews";
}

impl Deletable for AdminReview {
    const IGNORE_NOT_FOUND: bool = true;
}
