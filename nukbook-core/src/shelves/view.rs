//! Read-only projections of a membership list for display

use crate::types::{Id, ShelfState, SystemShelf};
use std::fmt;

pub const SYSTEM_TOOLTIP: &str = "System shelf (only one can be active)";
pub const CUSTOM_TOOLTIP: &str = "Custom shelf";
pub const PILL_FALLBACK_LABEL: &str = "Shelf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfBarRow {
    pub id: Id,
    pub label: String,
    pub active: bool,
    pub busy: bool,
    pub is_system: bool,
    pub tooltip: &'static str,
}

/// One toggle button per shelf: system shelves first, then by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfBar {
    pub rows: Vec<ShelfBarRow>,
    /// Every button is disabled while any toggle is in flight
    pub disabled: bool,
}

impl ShelfBar {
    pub fn new(shelves: &[ShelfState], busy: Option<Id>) -> Self {
        let mut sorted: Vec<&ShelfState> = shelves.iter().collect();
        sorted.sort_by(|a, b| b.is_system.cmp(&a.is_system).then_with(|| a.name.cmp(&b.name)));

        let rows = sorted
            .into_iter()
            .map(|s| ShelfBarRow {
                id: s.id,
                label: s.label().to_string(),
                active: s.has_book,
                busy: busy == Some(s.id),
                is_system: s.is_system,
                tooltip: if s.is_system {
                    SYSTEM_TOOLTIP
                } else {
                    CUSTOM_TOOLTIP
                },
            })
            .collect();

        Self {
            rows,
            disabled: busy.is_some(),
        }
    }
}

impl fmt::Display for ShelfBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let mark = if row.active { "x" } else { " " };
            let busy = if row.busy { " …" } else { "" };
            writeln!(f, "[{}] {:>4}  {}{}", mark, row.id, row.label, busy)?;
        }
        Ok(())
    }
}

/// Compact shelf picker: the active system shelf plus a custom-shelf count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfPill {
    /// Present system shelves in fixed order
    pub system: Vec<ShelfState>,
    /// Custom shelves sorted by name
    pub custom: Vec<ShelfState>,
}

impl ShelfPill {
    pub fn new(shelves: &[ShelfState]) -> Self {
        let system = SystemShelf::ALL
            .iter()
            .filter_map(|kind| {
                shelves
                    .iter()
                    .find(|s| s.is_system && s.name == kind.name())
                    .cloned()
            })
            .collect();

        let mut custom: Vec<ShelfState> = shelves.iter().filter(|s| !s.is_system).cloned().collect();
        custom.sort_by(|a, b| a.name.cmp(&b.name));

        Self { system, custom }
    }

    pub fn active_system(&self) -> Option<&ShelfState> {
        self.system.iter().find(|s| s.has_book)
    }

    /// Custom shelves holding the book
    pub fn custom_count(&self) -> usize {
        self.custom.iter().filter(|s| s.has_book).count()
    }

    /// "Reading · +2", "Shelf"
    pub fn label(&self) -> String {
        let base = self
            .active_system()
            .map(|s| s.label())
            .unwrap_or(PILL_FALLBACK_LABEL);
        match self.custom_count() {
            0 => base.to_string(),
            n => format!("{} · +{}", base, n),
        }
    }

    /// Shelf to toggle for "clear system shelf"
    pub fn clear_target(&self) -> Option<Id> {
        self.active_system().map(|s| s.id)
    }
}
