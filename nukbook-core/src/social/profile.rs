//! Someone's profile page and the follow button on it

use crate::client::ApiClient;
use crate::error::{ErrorClass, NukbookError, Result};
use crate::notice::{Notice, NoticeBus};
use crate::types::{FollowStatus, Id, Profile};

/// A loaded profile with optimistic follow/unfollow
pub struct ProfileView {
    client: ApiClient,
    notices: NoticeBus,
    profile: Profile,
    status: Option<String>,
}

/// The profile once its follow status is `to`, follower count adjusted
fn follow_counts(profile: &Profile, to: FollowStatus) -> Profile {
    let mut next = profile.clone();
    let was_follower = profile.follow_status == FollowStatus::Accepted;
    let is_follower = to == FollowStatus::Accepted;
    if is_follower && !was_follower {
        next.followers_count += 1;
    } else if was_follower && !is_follower {
        next.followers_count = next.followers_count.saturating_sub(1);
    }
    next.follow_status = to;
    next
}

impl ProfileView {
    pub async fn load(client: ApiClient, notices: NoticeBus, user_id: Id) -> Result<Self> {
        let profile = client.profile(user_id).await?;
        Ok(Self {
            client,
            notices,
            profile,
            status: None,
        })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Follow: shows `pending` for private users and `accepted` otherwise
    /// until the server says which it is
    pub async fn follow(&mut self) -> Result<FollowStatus> {
        let guess = if self.profile.is_private {
            FollowStatus::Pending
        } else {
            FollowStatus::Accepted
        };
        let previous = self.swap(guess);

        match self.client.follow(previous.id).await {
            Ok(status) => {
                self.profile = follow_counts(&previous, status);
                let message = match status {
                    FollowStatus::Pending => "Follow request sent.",
                    _ => "Now following.",
                };
                self.notices.push(Notice::success(message));
                Ok(status)
            }
            Err(e) => {
                self.revert(previous, &e);
                Err(e)
            }
        }
    }

    pub async fn unfollow(&mut self) -> Result<()> {
        let previous = self.swap(FollowStatus::None);

        match self.client.unfollow(previous.id).await {
            Ok(()) => {
                self.notices.push(Notice::success("Unfollowed."));
                Ok(())
            }
            Err(e) => {
                self.revert(previous, &e);
                Err(e)
            }
        }
    }

    fn swap(&mut self, to: FollowStatus) -> Profile {
        self.status = None;
        let next = follow_counts(&self.profile, to);
        std::mem::replace(&mut self.profile, next)
    }

    fn revert(&mut self, previous: Profile, err: &NukbookError) {
        tracing::warn!(user_id = previous.id, "Follow change failed: {}", err);
        self.profile = previous;
        if err.class() == ErrorClass::Forbidden {
            self.status = Some("You do not have access to update follows.".to_string());
            self.notices.push(Notice::error("Follow action not allowed."));
        } else {
            self.status = Some(err.to_string());
            self.notices.push(Notice::error("Failed to update follow."));
        }
    }
}
