//! Shelf membership: endpoints, the toggle planner and the shared store
//!
//! A book sits on any number of custom shelves but on at most one of the four
//! system shelves. [`plan_toggle`] computes the next membership list locally so
//! callers can show it before the server answers; [`ShelfStore`] applies it
//! optimistically and rolls back on failure.

mod manage;
mod store;
mod view;

pub use manage::ShelfList;
pub use store::{ShelfEvent, ShelfStore, ToggleError, ToggleOutcome};
pub use view::{ShelfBar, ShelfBarRow, ShelfPill, PILL_FALLBACK_LABEL};

use crate::client::{ApiClient, Auth, Method, NO_BODY};
use crate::error::Result;
use crate::types::{
    Id, ReadingStatus, ShelfBooks, ShelfInfo, ShelfState, ShelfSummary, ShelvesForBook,
    UserShelves, Visibility,
};
use serde::Serialize;

/// Local effect of flipping one shelf for one book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TogglePlan {
    /// The shelf as it was before the toggle
    pub shelf: ShelfState,
    pub turning_on: bool,
    /// Full membership list after the toggle
    pub next: Vec<ShelfState>,
    /// Other system shelves switched off as a side effect
    pub turned_off: Vec<Id>,
}

/// Compute the membership list after toggling `shelf_id`
///
/// Returns `None` when the shelf is not in `current`.
pub fn plan_toggle(current: &[ShelfState], shelf_id: Id) -> Option<TogglePlan> {
    let shelf = current.iter().find(|s| s.id == shelf_id)?.clone();
    let turning_on = !shelf.has_book;
    let exclusive = shelf.is_system && turning_on;

    let mut turned_off = Vec::new();
    let next = current
        .iter()
        .map(|s| {
            let mut s = s.clone();
            if s.id == shelf_id {
                s.has_book = turning_on;
            } else if exclusive && s.is_system && s.has_book {
                s.has_book = false;
                turned_off.push(s.id);
            }
            s
        })
        .collect();

    Some(TogglePlan {
        shelf,
        turning_on,
        next,
        turned_off,
    })
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: ReadingStatus,
}

#[derive(Debug, Default, Serialize)]
pub struct ShelfPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Serialize)]
struct NewShelf<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<Visibility>,
}

impl ApiClient {
    /// Every shelf of the current user with `has_book` for `book_id`
    pub async fn shelves_for_book(&self, book_id: Id) -> Result<ShelvesForBook> {
        self.get(&format!("/shelves/book/{}", book_id), Auth::Required)
            .await
    }

    pub async fn add_to_shelf(&self, shelf_id: Id, book_id: Id) -> Result<()> {
        let path = format!("/shelves/{}/books/{}", shelf_id, book_id);
        self.send_empty(Method::POST, &path, NO_BODY, Auth::Required)
            .await
    }

    pub async fn remove_from_shelf(&self, shelf_id: Id, book_id: Id) -> Result<()> {
        let path = format!("/shelves/{}/books/{}", shelf_id, book_id);
        self.send_empty(Method::DELETE, &path, NO_BODY, Auth::Required)
            .await
    }

    pub async fn set_reading_status(&self, book_id: Id, status: ReadingStatus) -> Result<()> {
        let path = format!("/books/{}/status", book_id);
        self.send_empty(
            Method::POST,
            &path,
            Some(&StatusBody { status }),
            Auth::Required,
        )
        .await
    }

    pub async fn clear_reading_status(&self, book_id: Id) -> Result<()> {
        let path = format!("/books/{}/status", book_id);
        self.send_empty(Method::DELETE, &path, NO_BODY, Auth::Required)
            .await
    }

    /// My shelves with book counts
    pub async fn my_shelves(&self) -> Result<Vec<ShelfSummary>> {
        self.get("/shelves", Auth::Required).await
    }

    pub async fn create_shelf(
        &self,
        name: &str,
        visibility: Option<Visibility>,
    ) -> Result<ShelfSummary> {
        let body = NewShelf { name, visibility };
        self.send(Method::POST, "/shelves", Some(&body), Auth::Required)
            .await
    }

    /// Rename and/or change visibility; system shelves cannot be renamed
    pub async fn update_shelf(&self, shelf_id: Id, patch: &ShelfPatch) -> Result<ShelfInfo> {
        let path = format!("/shelves/{}", shelf_id);
        self.send(Method::PATCH, &path, Some(patch), Auth::Required)
            .await
    }

    pub async fn delete_shelf(&self, shelf_id: Id) -> Result<()> {
        let path = format!("/shelves/{}", shelf_id);
        self.send_empty(Method::DELETE, &path, NO_BODY, Auth::Required)
            .await
    }

    pub async fn shelf_books(&self, shelf_id: Id) -> Result<ShelfBooks> {
        self.get(&format!("/shelves/{}/books", shelf_id), Auth::Required)
            .await
    }

    /// Shelves another user lets us see, each with a few covers
    pub async fn user_shelves(&self, user_id: Id) -> Result<UserShelves> {
        self.get(&format!("/users/{}/shelves", user_id), Auth::Required)
            .await
    }
}
