//! Shared shelf membership state keyed by book id

use super::{plan_toggle, TogglePlan};
use crate::client::ApiClient;
use crate::error::{NukbookError, Result};
use crate::notice::{Notice, NoticeBus};
use crate::types::{Id, ShelfState};
use futures::stream::Stream;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Status line shown next to the shelf buttons after a rejected toggle
pub const TOGGLE_FAILED: &str = "Failed to update shelf";

/// Change signals; they carry only the book id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfEvent {
    /// Local state for the book changed (load, optimistic apply, rollback)
    Updated { book_id: Id },
    /// The server accepted a membership change for the book
    Committed { book_id: Id },
}

impl ShelfEvent {
    pub fn book_id(&self) -> Id {
        match self {
            ShelfEvent::Updated { book_id } | ShelfEvent::Committed { book_id } => *book_id,
        }
    }
}

/// Result of an accepted toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub shelf_id: Id,
    pub has_book: bool,
    pub shelves: Vec<ShelfState>,
}

#[derive(Debug, Error)]
pub enum ToggleError {
    #[error("Login to manage shelves")]
    NotLoggedIn,

    #[error("Shelves for book {0} are not loaded")]
    NotLoaded(Id),

    #[error("Shelf {0} not found")]
    UnknownShelf(Id),

    #[error("Another shelf change is still in flight")]
    Busy,

    /// The server refused; local state was rolled back
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: NukbookError,
    },
}

#[derive(Debug, Default, Clone)]
struct BookShelves {
    shelves: Option<Vec<ShelfState>>,
    status: Option<String>,
    busy: Option<Id>,
    /// Bumped by every load and toggle; a toggle only settles its own round
    round: u64,
}

type Books = HashMap<Id, BookShelves>;

struct Inner {
    client: ApiClient,
    books: Mutex<Books>,
    events: broadcast::Sender<ShelfEvent>,
    notices: NoticeBus,
}

impl Inner {
    fn books(&self) -> MutexGuard<'_, Books> {
        self.books.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ShelfEvent) {
        let _ = self.events.send(event);
    }
}

/// An optimistic toggle that has not settled yet
///
/// Dropping it unsettled (the toggle future was cancelled) puts the previous
/// list back and frees the book for the next toggle.
struct Pending {
    inner: Arc<Inner>,
    book_id: Id,
    round: u64,
    previous: Option<Vec<ShelfState>>,
}

impl Pending {
    /// Clear the busy flag; on failure restore the previous list with `status`
    fn settle(mut self, failed_status: Option<&str>) {
        let previous = self.previous.take();
        let restore = match failed_status {
            Some(_) => previous,
            None => None,
        };
        self.finish(restore, failed_status);
    }

    fn finish(&self, restore: Option<Vec<ShelfState>>, status: Option<&str>) {
        let changed = {
            let mut books = self.inner.books();
            let entry = books.entry(self.book_id).or_default();
            if entry.round != self.round {
                // A reload superseded this toggle
                false
            } else {
                entry.busy = None;
                let changed = restore.is_some();
                if let Some(previous) = restore {
                    entry.shelves = Some(previous);
                }
                if let Some(status) = status {
                    entry.status = Some(status.to_string());
                }
                changed
            }
        };
        if changed {
            self.inner.emit(ShelfEvent::Updated {
                book_id: self.book_id,
            });
        }
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            tracing::debug!(book_id = self.book_id, "Shelf toggle cancelled, restoring");
            self.finish(Some(previous), None);
        }
    }
}

/// One membership list per book, shared by every view that shows it
///
/// Cheap to clone. The lock is only held for local reads and writes, never
/// across a request.
#[derive(Clone)]
pub struct ShelfStore {
    inner: Arc<Inner>,
}

impl ShelfStore {
    pub fn new(client: ApiClient, notices: NoticeBus) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                client,
                books: Mutex::new(HashMap::new()),
                events,
                notices,
            }),
        }
    }

    pub fn notices(&self) -> &NoticeBus {
        &self.inner.notices
    }

    /// Fetch the membership list for a book
    ///
    /// Resolves to `None` when logged out or on any failure. A successful
    /// fetch replaces the list and supersedes any toggle still in flight.
    pub async fn load(&self, book_id: Id) -> Option<Vec<ShelfState>> {
        let shelves = if self.inner.client.tokens().get().await.is_none() {
            None
        } else {
            match self.inner.client.shelves_for_book(book_id).await {
                Ok(data) => Some(data.shelves),
                Err(e) => {
                    tracing::warn!(book_id, "Failed to load shelves: {}", e);
                    None
                }
            }
        };

        {
            let mut books = self.inner.books();
            let entry = books.entry(book_id).or_default();
            if shelves.is_some() {
                entry.busy = None;
                entry.round += 1;
            }
            entry.shelves = shelves.clone();
            entry.status = None;
        }
        self.emit(ShelfEvent::Updated { book_id });
        shelves
    }

    /// Current local list, if loaded
    pub async fn snapshot(&self, book_id: Id) -> Option<Vec<ShelfState>> {
        self.inner
            .books()
            .get(&book_id)
            .and_then(|b| b.shelves.clone())
    }

    /// Last failure message for the book
    pub async fn status(&self, book_id: Id) -> Option<String> {
        self.inner
            .books()
            .get(&book_id)
            .and_then(|b| b.status.clone())
    }

    /// Shelf currently being toggled for the book
    pub async fn busy(&self, book_id: Id) -> Option<Id> {
        self.inner.books().get(&book_id).and_then(|b| b.busy)
    }

    /// Flip one shelf for a book, optimistically
    ///
    /// The new list is visible to every holder before the first request goes
    /// out. On rejection the exact previous list is restored.
    pub async fn toggle(
        &self,
        book_id: Id,
        shelf_id: Id,
    ) -> std::result::Result<ToggleOutcome, ToggleError> {
        if self.inner.client.tokens().get().await.is_none() {
            return Err(ToggleError::NotLoggedIn);
        }

        let (pending, plan) = {
            let mut books = self.inner.books();
            let entry = books.entry(book_id).or_default();
            if entry.busy.is_some() {
                return Err(ToggleError::Busy);
            }
            let current = entry.shelves.clone().ok_or(ToggleError::NotLoaded(book_id))?;
            let plan = plan_toggle(&current, shelf_id).ok_or(ToggleError::UnknownShelf(shelf_id))?;

            entry.shelves = Some(plan.next.clone());
            entry.status = None;
            entry.busy = Some(shelf_id);
            entry.round += 1;
            let pending = Pending {
                inner: self.inner.clone(),
                book_id,
                round: entry.round,
                previous: Some(current),
            };
            (pending, plan)
        };
        self.emit(ShelfEvent::Updated { book_id });

        let result = self.push_plan(book_id, &plan).await;

        let label = plan.shelf.label().to_string();
        match result {
            Ok(()) => {
                pending.settle(None);
                let notice = if plan.turning_on {
                    Notice::success(format!("Added to {}.", label))
                } else {
                    Notice::info(format!("Removed from {}.", label))
                };
                self.inner.notices.push(notice);
                tracing::info!(book_id, shelf_id, on = plan.turning_on, "Shelf updated");
                self.emit(ShelfEvent::Updated { book_id });
                self.emit(ShelfEvent::Committed { book_id });
                Ok(ToggleOutcome {
                    shelf_id,
                    has_book: plan.turning_on,
                    shelves: plan.next,
                })
            }
            Err(e) => {
                tracing::warn!(book_id, shelf_id, "Shelf toggle rejected: {}", e);
                pending.settle(Some(TOGGLE_FAILED));
                self.inner.notices.push(Notice::error(format!("{}.", TOGGLE_FAILED)));
                Err(ToggleError::Rejected {
                    message: e.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Turn off whichever system shelf holds the book, if any
    pub async fn clear_system(
        &self,
        book_id: Id,
    ) -> std::result::Result<Option<ToggleOutcome>, ToggleError> {
        let active = self
            .snapshot(book_id)
            .await
            .ok_or(ToggleError::NotLoaded(book_id))?
            .into_iter()
            .find(|s| s.is_system && s.has_book);

        match active {
            Some(shelf) => self.toggle(book_id, shelf.id).await.map(Some),
            None => Ok(None),
        }
    }

    async fn push_plan(&self, book_id: Id, plan: &TogglePlan) -> Result<()> {
        let client = &self.inner.client;
        let shelf = &plan.shelf;

        if plan.turning_on {
            client.add_to_shelf(shelf.id, book_id).await?;

            // Server already enforces exclusivity; these only tidy up
            let deletes = plan
                .turned_off
                .iter()
                .map(|&other| client.remove_from_shelf(other, book_id));
            for (other, result) in plan
                .turned_off
                .iter()
                .zip(futures::future::join_all(deletes).await)
            {
                if let Err(e) = result {
                    tracing::warn!(book_id, shelf_id = other, "Ignoring failed shelf cleanup: {}", e);
                }
            }

            if let Some(kind) = shelf.system_kind() {
                client.set_reading_status(book_id, kind.reading_status()).await?;
            }
        } else {
            client.remove_from_shelf(shelf.id, book_id).await?;
            if shelf.is_system {
                client.clear_reading_status(book_id).await?;
            }
        }
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShelfEvent> {
        self.inner.events.subscribe()
    }

    /// Signals for one book only; lagged receivers skip ahead
    pub fn updates(&self, book_id: Id) -> impl Stream<Item = ShelfEvent> {
        BroadcastStream::new(self.subscribe()).filter_map(move |result| match result {
            Ok(event) if event.book_id() == book_id => Some(event),
            _ => None,
        })
    }

    /// Reload a book every time a change for it is committed
    pub fn spawn_reconciler(&self) -> JoinHandle<()> {
        let store = self.clone();
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ShelfEvent::Committed { book_id }) => {
                        tracing::debug!(book_id, "Reconciling shelves");
                        store.load(book_id).await;
                    }
                    Ok(ShelfEvent::Updated { .. }) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Reconciler lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn emit(&self, event: ShelfEvent) {
        self.inner.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenStore;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;

    fn store() -> ShelfStore {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9"), tokens).unwrap();
        ShelfStore::new(client, NoticeBus::new())
    }

    #[tokio::test]
    async fn test_load_without_token_is_none() {
        let store = store();
        assert_eq!(store.load(5).await, None);
        assert_eq!(store.snapshot(5).await, None);
    }

    #[tokio::test]
    async fn test_toggle_without_token() {
        let store = store();
        let err = store.toggle(5, 1).await.unwrap_err();
        assert!(matches!(err, ToggleError::NotLoggedIn));
    }

    #[tokio::test]
    async fn test_toggle_before_load() {
        let store = store();
        store.inner.client.tokens().set("t0k").await.unwrap();
        let err = store.toggle(5, 1).await.unwrap_err();
        assert!(matches!(err, ToggleError::NotLoaded(5)));
        assert_eq!(store.busy(5).await, None);
    }

    fn shelf(id: Id, name: &str, is_system: bool, has_book: bool) -> ShelfState {
        ShelfState {
            id,
            name: name.to_string(),
            is_system,
            has_book,
            visibility: None,
        }
    }

    /// Put the book in the state an optimistic toggle leaves behind
    fn start_toggle(store: &ShelfStore, book_id: Id) -> Pending {
        let before = vec![shelf(1, "Reading", true, false)];
        let mut books = store.inner.books();
        let entry = books.entry(book_id).or_default();
        entry.shelves = Some(vec![shelf(1, "Reading", true, true)]);
        entry.busy = Some(1);
        entry.round += 1;
        Pending {
            inner: store.inner.clone(),
            book_id,
            round: entry.round,
            previous: Some(before),
        }
    }

    #[tokio::test]
    async fn test_dropped_toggle_restores_and_frees_book() {
        let store = store();
        let mut rx = store.subscribe();
        drop(start_toggle(&store, 5));

        assert_eq!(store.busy(5).await, None);
        assert_eq!(
            store.snapshot(5).await,
            Some(vec![shelf(1, "Reading", true, false)])
        );
        assert_eq!(store.status(5).await, None);
        assert_eq!(rx.try_recv().unwrap(), ShelfEvent::Updated { book_id: 5 });
    }

    #[tokio::test]
    async fn test_settled_toggle_keeps_new_list() {
        let store = store();
        start_toggle(&store, 5).settle(None);

        assert_eq!(store.busy(5).await, None);
        assert_eq!(
            store.snapshot(5).await,
            Some(vec![shelf(1, "Reading", true, true)])
        );
    }

    #[tokio::test]
    async fn test_failed_toggle_restores_with_status() {
        let store = store();
        start_toggle(&store, 5).settle(Some(TOGGLE_FAILED));

        assert_eq!(store.busy(5).await, None);
        assert_eq!(
            store.snapshot(5).await,
            Some(vec![shelf(1, "Reading", true, false)])
        );
        assert_eq!(store.status(5).await.as_deref(), Some(TOGGLE_FAILED));
    }

    #[tokio::test]
    async fn test_superseded_toggle_leaves_reload_alone() {
        let store = store();
        let pending = start_toggle(&store, 5);
        {
            let mut books = store.inner.books();
            let entry = books.entry(5).or_default();
            entry.shelves = Some(vec![shelf(2, "Read", true, true)]);
            entry.busy = None;
            entry.round += 1;
        }
        drop(pending);

        assert_eq!(
            store.snapshot(5).await,
            Some(vec![shelf(2, "Read", true, true)])
        );
    }

    #[test]
    fn test_event_book_id() {
        assert_eq!(ShelfEvent::Committed { book_id: 3 }.book_id(), 3);
        assert_eq!(ShelfEvent::Updated { book_id: 4 }.book_id(), 4);
    }
}
