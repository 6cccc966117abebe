//! State of one admin page

use super::{AdminResource, Creatable, Deletable, Editable, ListQuery, MediaUpdate, WithMedia};
use crate::client::{ApiClient, Upload};
use crate::error::NukbookError;
use crate::guard::{Disposition, ErrorGuard, GuardOptions};
use crate::nav::Redirect;
use crate::optimistic::OptimisticList;
use crate::types::Id;
use thiserror::Error;

/// Why an admin operation did not go through
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminFailure {
    /// Leave the page (login or home)
    #[error("Redirect to {0}")]
    Redirect(Redirect),
    /// Stay and show the message
    #[error("{0}")]
    Message(String),
}

/// Rows of one admin collection plus the page's error line
pub struct AdminTable<R: AdminResource> {
    client: ApiClient,
    guard: ErrorGuard,
    rows: OptimisticList<R>,
    query: ListQuery,
    error: Option<String>,
    busy: Option<Id>,
}

impl<R: AdminResource> AdminTable<R> {
    pub fn new(client: ApiClient) -> Self {
        let guard = ErrorGuard::new(client.tokens().clone(), R::PAGE);
        Self {
            client,
            guard,
            rows: OptimisticList::default(),
            query: ListQuery::default(),
            error: None,
            busy: None,
        }
    }

    pub fn rows(&self) -> &[R] {
        self.rows.items()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Row with a request in flight
    pub fn busy(&self) -> Option<Id> {
        self.busy
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Change the search text; takes effect on the next [`AdminTable::load`]
    pub fn set_filter(&mut self, q: &str) {
        self.query = self.query.clone().with_filter(q);
        self.query.offset = 0;
    }

    pub fn set_page(&mut self, offset: u32, limit: u32) {
        self.query.offset = offset;
        self.query.limit = limit.max(1);
    }

    pub async fn load(&mut self) -> Result<(), AdminFailure> {
        self.error = None;
        match self.client.admin_list::<R>(&self.query).await {
            Ok(page) => {
                tracing::debug!(path = R::PATH, rows = page.items.len(), "Loaded admin rows");
                self.rows.replace_all(page.items);
                Ok(())
            }
            Err(e) => self.fail(e, GuardOptions::default()).await,
        }
    }

    /// Remove the row at once, restoring it if the server refuses
    pub async fn delete(&mut self, id: Id) -> Result<(), AdminFailure>
    where
        R: Deletable,
    {
        self.error = None;
        self.busy = Some(id);
        let snapshot = self.rows.remove(id);

        let result = self.client.admin_delete::<R>(id).await;
        self.busy = None;

        match result {
            Ok(()) => {
                tracing::info!(path = R::PATH, id, "Deleted");
                Ok(())
            }
            Err(e) => {
                let options = GuardOptions {
                    ignore_not_found: R::IGNORE_NOT_FOUND,
                };
                match self.guard.resolve(&e, options).await {
                    Disposition::Ignored => {
                        tracing::debug!(path = R::PATH, id, "Already gone");
                        Ok(())
                    }
                    other => {
                        self.rows.restore(snapshot);
                        Err(self.settle(other))
                    }
                }
            }
        }
    }

    /// Create a row; it goes first in the list once the server has it
    pub async fn create(&mut self, draft: &R::Draft) -> Result<R, AdminFailure>
    where
        R: Creatable,
    {
        self.error = None;
        if let Err(message) = R::check(draft) {
            return Err(self.settle(Disposition::Message(message)));
        }

        match self.client.admin_create::<R>(draft).await {
            Ok(created) => {
                tracing::info!(path = R::PATH, id = created.key(), "Created");
                self.rows.prepend(created.clone());
                Ok(created)
            }
            Err(e) => self.fail(e, GuardOptions::default()).await,
        }
    }

    /// Create a row and attach its image; an upload failure keeps the row
    pub async fn create_with_media(
        &mut self,
        draft: &R::Draft,
        upload: Upload,
    ) -> Result<R, AdminFailure>
    where
        R: Creatable + WithMedia,
    {
        let created = self.create(draft).await?;
        match self.upload(created.key(), upload).await {
            Ok(media) => {
                let mut row = created;
                row.set_media_url(media.url);
                Ok(row)
            }
            // The row exists; the page shows the upload error next to it
            Err(AdminFailure::Message(_)) => Ok(created),
            Err(redirect) => Err(redirect),
        }
    }

    /// Replace the row with the server's version after a successful edit
    pub async fn update(&mut self, id: Id, patch: &R::Patch) -> Result<R, AdminFailure>
    where
        R: Editable,
    {
        self.error = None;
        if let Err(message) = R::check_patch(patch) {
            return Err(self.settle(Disposition::Message(message)));
        }

        self.busy = Some(id);
        let result = self.client.admin_update::<R>(id, patch).await;
        self.busy = None;

        match result {
            Ok(updated) => {
                if !self.rows.replace(updated.clone()) {
                    tracing::debug!(path = R::PATH, id, "Edited row is not on this page");
                }
                Ok(updated)
            }
            Err(e) => self.fail(e, GuardOptions::default()).await,
        }
    }

    /// Upload the row's image; the row picks up the stored URL
    pub async fn upload(&mut self, id: Id, upload: Upload) -> Result<MediaUpdate, AdminFailure>
    where
        R: WithMedia,
    {
        self.error = None;
        self.busy = Some(id);
        let result = self.client.admin_upload::<R>(id, upload).await;
        self.busy = None;

        match result {
            Ok(media) => {
                self.rows
                    .update(id, |row| row.set_media_url(media.url.clone()));
                Ok(media)
            }
            Err(e) => self.fail(e, GuardOptions::default()).await,
        }
    }

    async fn fail<T>(&mut self, err: NukbookError, options: GuardOptions) -> Result<T, AdminFailure> {
        let disposition = self.guard.resolve(&err, options).await;
        Err(self.settle(disposition))
    }

    fn settle(&mut self, disposition: Disposition) -> AdminFailure {
        match disposition {
            Disposition::Redirect(to) => AdminFailure::Redirect(to),
            Disposition::Message(message) => {
                self.error = Some(message.clone());
                AdminFailure::Message(message)
            }
            // Only delete asks for 404 to be ignored and handles it itself
            Disposition::Ignored => AdminFailure::Message(String::new()),
        }
    }
}
