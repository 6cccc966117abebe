//! Apply-then-confirm state updates with rollback
//!
//! Views hold plain values. A mutation swaps in the expected next value, runs
//! the request, and puts the exact previous value back if the request fails.

use crate::error::Result;
use crate::types::Id;
use std::future::Future;

/// Replace `state` with `next`, await `request`, restore the old value on error
pub async fn commit<T, R, F>(state: &mut T, next: T, request: F) -> Result<R>
where
    F: Future<Output = Result<R>>,
{
    let previous = std::mem::replace(state, next);
    match request.await {
        Ok(value) => Ok(value),
        Err(e) => {
            *state = previous;
            Err(e)
        }
    }
}

/// Rows addressable by their API id
pub trait Keyed {
    fn key(&self) -> Id;
}

/// List of rows with snapshot/restore around local edits
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticList<T> {
    items: Vec<T>,
}

impl<T> Default for OptimisticList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// Copy of a list taken before an optimistic edit
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T>(Vec<T>);

impl<T: Clone + Keyed> OptimisticList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: Id) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot(self.items.clone())
    }

    pub fn restore(&mut self, snapshot: Snapshot<T>) {
        self.items = snapshot.0;
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Newly created rows go first
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Replace the row with the same key; returns false when absent
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|row| row.key() == item.key()) {
            Some(row) => {
                *row = item;
                true
            }
            None => false,
        }
    }

    /// Drop the row, returning the list as it was before
    pub fn remove(&mut self, key: Id) -> Snapshot<T> {
        let snapshot = self.snapshot();
        self.items.retain(|item| item.key() != key);
        snapshot
    }

    /// Edit the row in place, returning the list as it was before
    pub fn update<F>(&mut self, key: Id, edit: F) -> Option<Snapshot<T>>
    where
        F: FnOnce(&mut T),
    {
        let snapshot = self.snapshot();
        let row = self.items.iter_mut().find(|item| item.key() == key)?;
        edit(row);
        Some(snapshot)
    }
}

impl Keyed for crate::types::ShelfSummary {
    fn key(&self) -> Id {
        self.id
    }
}

impl Keyed for crate::types::FollowRequest {
    fn key(&self) -> Id {
        self.id
    }
}
