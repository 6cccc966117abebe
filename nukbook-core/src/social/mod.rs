//! Profiles, follows, activity and notifications

mod compare;
mod notifications;
mod profile;
mod requests;

pub use compare::{
    compatibility, CompareSort, TasteCompareView, COMPARE_PAGE, COMPARE_PAGE_MAX, PRIVACY_BLOCKED,
};
pub use notifications::{NotificationBell, POLL_INTERVAL};
pub use profile::ProfileView;
pub use requests::FollowRequests;

use crate::client::{with_query, ApiClient, Auth, Method, Upload, NO_BODY};
use crate::error::Result;
use crate::types::{
    ActivityItem, FollowRequest, FollowState, FollowStatus, Id, LikedAuthor, NotificationCounts,
    NotificationPreview, Profile, UserRef,
};
use serde::{Deserialize, Serialize};

/// Who a follower/following/activity listing is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whose {
    Mine,
    User(Id),
}

impl Whose {
    fn path(self, tail: &str) -> String {
        match self {
            Whose::Mine => format!("/me/{}", tail),
            Whose::User(id) => format!("/users/{}/{}", id, tail),
        }
    }

    /// Page size the API defaults to for activity feeds
    pub fn activity_limit(self) -> u32 {
        match self {
            Whose::Mine => 20,
            Whose::User(_) => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Privacy {
    #[serde(default)]
    pub id: Id,
    pub is_private: bool,
}

/// Answer of the avatar and cover uploads
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProfileMedia {
    pub id: Id,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

#[derive(Serialize)]
struct PrivacyBody {
    is_private: bool,
}

#[derive(Serialize)]
struct SeenBody {
    requests: bool,
    activity: bool,
}

impl ApiClient {
    pub async fn profile(&self, user_id: Id) -> Result<Profile> {
        self.get(&format!("/users/{}", user_id), Auth::Required)
            .await
    }

    /// `pending` for private targets, `accepted` otherwise
    pub async fn follow(&self, user_id: Id) -> Result<FollowStatus> {
        let state: FollowState = self
            .send(
                Method::POST,
                &format!("/users/{}/follow", user_id),
                NO_BODY,
                Auth::Required,
            )
            .await?;
        Ok(state.status)
    }

    pub async fn unfollow(&self, user_id: Id) -> Result<()> {
        self.send_empty(
            Method::POST,
            &format!("/users/{}/unfollow", user_id),
            NO_BODY,
            Auth::Required,
        )
        .await
    }

    pub async fn follow_requests(&self) -> Result<Vec<FollowRequest>> {
        self.get("/me/follow-requests", Auth::Required).await
    }

    pub async fn approve_request(&self, request_id: Id) -> Result<FollowStatus> {
        let state: FollowState = self
            .send(
                Method::POST,
                &format!("/me/follow-requests/{}/approve", request_id),
                NO_BODY,
                Auth::Required,
            )
            .await?;
        Ok(state.status)
    }

    pub async fn deny_request(&self, request_id: Id) -> Result<()> {
        self.send_empty(
            Method::POST,
            &format!("/me/follow-requests/{}/deny", request_id),
            NO_BODY,
            Auth::Required,
        )
        .await
    }

    pub async fn followers(&self, whose: Whose) -> Result<Vec<UserRef>> {
        self.get(&whose.path("followers"), Auth::Required).await
    }

    pub async fn following(&self, whose: Whose) -> Result<Vec<UserRef>> {
        self.get(&whose.path("following"), Auth::Required).await
    }

    /// Activity of a user, or of everyone I follow for [`Whose::Mine`]
    pub async fn activity(&self, whose: Whose, limit: u32, offset: u32) -> Result<Vec<ActivityItem>> {
        let path = with_query(
            &whose.path("activity"),
            &[
                ("limit", Some(limit.to_string())),
                ("offset", Some(offset.to_string())),
            ],
        );
        self.get(&path, Auth::Required).await
    }

    pub async fn liked_authors(&self, user_id: Id) -> Result<Vec<LikedAuthor>> {
        self.get(&format!("/users/{}/liked-authors", user_id), Auth::Required)
            .await
    }

    pub async fn set_privacy(&self, is_private: bool) -> Result<Privacy> {
        self.send(
            Method::PATCH,
            "/me/privacy",
            Some(&PrivacyBody { is_private }),
            Auth::Required,
        )
        .await
    }

    pub async fn upload_avatar(&self, upload: Upload) -> Result<ProfileMedia> {
        self.upload("/me/avatar", upload).await
    }

    pub async fn upload_cover(&self, upload: Upload) -> Result<ProfileMedia> {
        self.upload("/me/cover", upload).await
    }

    pub async fn notification_counts(&self) -> Result<NotificationCounts> {
        self.get("/me/notifications", Auth::Required).await
    }

    pub async fn notification_preview(&self) -> Result<NotificationPreview> {
        self.get("/me/notifications/preview", Auth::Required).await
    }

    /// Mark both requests and activity as seen
    pub async fn mark_notifications_seen(&self) -> Result<()> {
        self.send_empty(
            Method::POST,
            "/me/notifications/seen",
            Some(&SeenBody {
                requests: true,
                activity: true,
            }),
            Auth::Required,
        )
        .await
    }
}
