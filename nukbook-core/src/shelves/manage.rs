//! The "my shelves" page: list, create, rename, visibility, delete

use super::ShelfPatch;
use crate::client::ApiClient;
use crate::error::{NukbookError, Result};
use crate::notice::{Notice, NoticeBus};
use crate::optimistic::OptimisticList;
use crate::types::{Id, ShelfSummary, Visibility};

const MAX_NAME_LEN: usize = 64;

/// My shelves with optimistic edits
pub struct ShelfList {
    client: ApiClient,
    notices: NoticeBus,
    shelves: OptimisticList<ShelfSummary>,
    status: Option<String>,
}

impl ShelfList {
    pub fn new(client: ApiClient, notices: NoticeBus) -> Self {
        Self {
            client,
            notices,
            shelves: OptimisticList::default(),
            status: None,
        }
    }

    pub fn shelves(&self) -> &[ShelfSummary] {
        self.shelves.items()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub async fn load(&mut self) -> Result<()> {
        self.status = None;
        if self.client.tokens().get().await.is_none() {
            self.status = Some("Login to view your shelves.".to_string());
            self.shelves.replace_all(Vec::new());
            return Err(NukbookError::MissingToken);
        }

        match self.client.my_shelves().await {
            Ok(rows) => {
                self.shelves.replace_all(rows);
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn create(&mut self, name: &str, visibility: Visibility) -> Result<ShelfSummary> {
        self.status = None;
        let name = validate_name(name).map_err(|e| self.record(e))?;

        match self.client.create_shelf(name, Some(visibility)).await {
            Ok(created) => {
                tracing::info!(shelf_id = created.id, "Created shelf");
                // Reload for counts and server ordering; keep the new row if that fails
                if !self.refresh().await {
                    self.shelves.prepend(created.clone());
                }
                Ok(created)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Rename a custom shelf; the list shows the new name while saving
    pub async fn rename(&mut self, id: Id, name: &str) -> Result<()> {
        self.status = None;
        let name = validate_name(name).map_err(|e| self.record(e))?.to_string();

        let snapshot = self
            .shelves
            .update(id, |s| s.name = name.clone())
            .ok_or_else(|| self.record(NukbookError::Invalid(format!("Shelf {} not found", id))))?;

        let patch = ShelfPatch {
            name: Some(name),
            visibility: None,
        };
        match self.client.update_shelf(id, &patch).await {
            Ok(_) => {
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.shelves.restore(snapshot);
                self.fail(e)
            }
        }
    }

    pub async fn set_visibility(&mut self, id: Id, visibility: Visibility) -> Result<()> {
        self.status = None;
        let snapshot = self
            .shelves
            .update(id, |s| s.visibility = visibility)
            .ok_or_else(|| self.record(NukbookError::Invalid(format!("Shelf {} not found", id))))?;

        let patch = ShelfPatch {
            name: None,
            visibility: Some(visibility),
        };
        match self.client.update_shelf(id, &patch).await {
            Ok(_) => {
                self.notices.push(Notice::success("Shelf visibility updated."));
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.shelves.restore(snapshot);
                self.notices
                    .push(Notice::error("Failed to update shelf visibility."));
                self.fail(e)
            }
        }
    }

    /// Remove the row at once; put it back if the server refuses
    pub async fn delete(&mut self, id: Id) -> Result<()> {
        self.status = None;
        let snapshot = self.shelves.remove(id);

        match self.client.delete_shelf(id).await {
            Ok(()) => {
                tracing::info!(shelf_id = id, "Deleted shelf");
                Ok(())
            }
            Err(e) => {
                self.shelves.restore(snapshot);
                self.fail(e)
            }
        }
    }

    /// Reload after a saved change; a failed reload keeps the local rows
    async fn refresh(&mut self) -> bool {
        match self.load().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Shelf list refresh failed after save: {}", e);
                self.status = None;
                false
            }
        }
    }

    fn record(&mut self, err: NukbookError) -> NukbookError {
        self.status = Some(match &err {
            NukbookError::Invalid(message) => message.clone(),
            other => other.to_string(),
        });
        err
    }

    fn fail<T>(&mut self, err: NukbookError) -> Result<T> {
        Err(self.record(err))
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NukbookError::Invalid("Shelf name required.".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(NukbookError::Invalid("Shelf name too long.".to_string()));
    }
    Ok(name)
}
