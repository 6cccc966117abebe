//! Author, genre and tag pickers on the admin book form

use super::LookupSource;
use crate::client::{with_query, ApiClient, Auth};
use crate::error::Result;
use crate::types::Id;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const PICKER_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Authors,
    Genres,
    Tags,
}

impl LookupKind {
    pub fn path(self) -> &'static str {
        match self {
            LookupKind::Authors => "/admin/authors/lookup",
            LookupKind::Genres => "/admin/genres/lookup",
            LookupKind::Tags => "/admin/tags/lookup",
        }
    }
}

/// `{id, name}` option offered by a picker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickerOption {
    pub id: Id,
    pub name: String,
}

#[derive(Deserialize)]
struct Items {
    items: Vec<PickerOption>,
}

impl ApiClient {
    /// Name lookup for the admin pickers
    pub async fn admin_lookup(&self, kind: LookupKind, query: &str, limit: u32) -> Result<Vec<PickerOption>> {
        let path = with_query(
            kind.path(),
            &[("q", Some(query.to_string())), ("limit", Some(limit.to_string()))],
        );
        let data: Items = self.get(&path, Auth::Required).await?;
        Ok(data.items)
    }
}

pub struct AdminLookup {
    client: ApiClient,
    kind: LookupKind,
}

impl AdminLookup {
    pub fn new(client: ApiClient, kind: LookupKind) -> Self {
        Self { client, kind }
    }
}

#[async_trait]
impl LookupSource for AdminLookup {
    type Output = Vec<PickerOption>;

    async fn lookup(&self, query: &str) -> Result<Vec<PickerOption>> {
        self.client.admin_lookup(self.kind, query, PICKER_LIMIT).await
    }
}

/// The chosen options of one picker, unique by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Picker {
    selected: Vec<PickerOption>,
}

impl Picker {
    pub fn new(selected: Vec<PickerOption>) -> Self {
        let mut picker = Self::default();
        for option in selected {
            picker.add(option);
        }
        picker
    }

    pub fn selected(&self) -> &[PickerOption] {
        &self.selected
    }

    pub fn ids(&self) -> Vec<Id> {
        self.selected.iter().map(|o| o.id).collect()
    }

    /// Returns false when the option was already chosen
    pub fn add(&mut self, option: PickerOption) -> bool {
        if self.selected.iter().any(|o| o.id == option.id) {
            return false;
        }
        self.selected.push(option);
        true
    }

    pub fn remove(&mut self, id: Id) {
        self.selected.retain(|o| o.id != id);
    }

    /// Lookup results minus what is already chosen
    pub fn offer<'a>(&self, results: &'a [PickerOption]) -> Vec<&'a PickerOption> {
        results
            .iter()
            .filter(|r| !self.selected.iter().any(|o| o.id == r.id))
            .collect()
    }
}
