//! Users, follows, activity and notifications

use super::{AuthorRef, BookRef, Id, ReadingStatus};
use serde::{Deserialize, Serialize};

/// The logged-in user (`/auth/me`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Me {
    pub id: Id,
    pub email: String,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl Me {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Answer of `/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Minimal user reference embedded in other payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserRef {
    /// `@username`
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FollowStatus {
    #[default]
    None,
    Pending,
    Accepted,
}

/// Answer of follow / approve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowState {
    pub status: FollowStatus,
}

/// Public profile of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub is_me: bool,
    #[serde(default)]
    pub follow_status: FollowStatus,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// Pending request from someone who wants to follow me
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowRequest {
    pub id: Id,
    pub requester: UserRef,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Status,
    Review,
}

/// A status change or review by someone I follow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityItem {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub user: UserRef,
    pub book: BookRef,
    #[serde(default)]
    pub status: Option<ReadingStatus>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ActivityItem {
    /// One-line description, e.g. `@ana started reading Dune`
    pub fn summary(&self) -> String {
        let verb = match self.kind {
            ActivityKind::Review => "reviewed",
            ActivityKind::Status => self
                .status
                .map(ReadingStatus::activity_phrase)
                .unwrap_or("wants to read"),
        };
        format!("{} {} {}", self.user.handle(), verb, self.book.title)
    }
}

/// Unseen counts (`/me/notifications`)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationCounts {
    pub requests: u32,
    pub activity: u32,
}

impl NotificationCounts {
    pub fn total(&self) -> u32 {
        self.requests + self.activity
    }
}

/// Latest unseen items (`/me/notifications/preview`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationPreview {
    #[serde(default)]
    pub requests: Vec<FollowRequest>,
    #[serde(default)]
    pub activity: Vec<ActivityItem>,
}

/// Entry of `/users/{id}/liked-authors`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikedAuthor {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub liked_at: Option<String>,
}


/// One book both users rated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SharedRating {
    pub book_id: Id,
    pub title: String,
    pub viewer_rating: u8,
    pub target_rating: u8,
    pub diff: u8,
}

/// A book one side loved (rated 4+) that the other has not read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LovedBook {
    pub book_id: Id,
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(alias = "viewer_rating", alias = "target_rating")]
    pub rating: u8,
}

/// Answer of `/users/{id}/taste-compare`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TasteCompare {
    pub viewer: UserRef,
    pub target: UserRef,
    pub common_count: u32,
    pub similarity_score: f64,
    pub mean_abs_diff: f64,
    #[serde(default)]
    pub pearson: Option<f64>,
    #[serde(default)]
    pub agreements: Vec<SharedRating>,
    #[serde(default)]
    pub disagreements: Vec<SharedRating>,
    #[serde(default)]
    pub viewer_loved_target_unread: Vec<LovedBook>,
    #[serde(default)]
    pub target_loved_viewer_unread: Vec<LovedBook>,
    #[serde(default)]
    pub shared_ratings: Vec<SharedRating>,
}
