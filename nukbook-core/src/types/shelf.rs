//! Shelves and reading statuses

use super::{AuthorRef, Id};
use serde::{Deserialize, Serialize};

/// Membership of one shelf for one book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelfState {
    pub id: Id,
    pub name: String,
    pub is_system: bool,
    pub has_book: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl ShelfState {
    /// The fixed reading-status shelf this is, if any
    pub fn system_kind(&self) -> Option<SystemShelf> {
        if self.is_system {
            SystemShelf::from_name(&self.name)
        } else {
            None
        }
    }

    /// Human label ("Want to read" for `want-to-read`, custom names as-is)
    pub fn label(&self) -> &str {
        self.system_kind()
            .map(SystemShelf::label)
            .unwrap_or(self.name.as_str())
    }
}

/// Answer of `/shelves/book/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelvesForBook {
    pub book_id: Id,
    pub shelves: Vec<ShelfState>,
}

/// The four reading-status shelves every user has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemShelf {
    WantToRead,
    Reading,
    Read,
    Dropped,
}

impl SystemShelf {
    /// Display order
    pub const ALL: [SystemShelf; 4] = [
        SystemShelf::WantToRead,
        SystemShelf::Reading,
        SystemShelf::Read,
        SystemShelf::Dropped,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "want-to-read" => Some(SystemShelf::WantToRead),
            "reading" => Some(SystemShelf::Reading),
            "read" => Some(SystemShelf::Read),
            "dropped" => Some(SystemShelf::Dropped),
            _ => None,
        }
    }

    /// Shelf name as stored by the API
    pub fn name(self) -> &'static str {
        match self {
            SystemShelf::WantToRead => "want-to-read",
            SystemShelf::Reading => "reading",
            SystemShelf::Read => "read",
            SystemShelf::Dropped => "dropped",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SystemShelf::WantToRead => "Want to read",
            SystemShelf::Reading => "Reading",
            SystemShelf::Read => "Read",
            SystemShelf::Dropped => "Dropped",
        }
    }

    /// Reading status recorded when a book lands on this shelf
    pub fn reading_status(self) -> ReadingStatus {
        match self {
            SystemShelf::WantToRead => ReadingStatus::WantToRead,
            SystemShelf::Reading => ReadingStatus::Reading,
            SystemShelf::Read => ReadingStatus::Finished,
            SystemShelf::Dropped => ReadingStatus::Dropped,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    WantToRead,
    Reading,
    Finished,
    Dropped,
}

impl ReadingStatus {
    /// "Want to read", "Reading", "Finished", "Dropped"
    pub fn label(self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "Want to read",
            ReadingStatus::Reading => "Reading",
            ReadingStatus::Finished => "Finished",
            ReadingStatus::Dropped => "Dropped",
        }
    }

    /// Verb phrase used in activity feeds ("@ana started reading Dune")
    pub fn activity_phrase(self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "wants to read",
            ReadingStatus::Reading => "started reading",
            ReadingStatus::Finished => "finished",
            ReadingStatus::Dropped => "dropped",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Followers,
    #[default]
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Followers => "followers",
            Visibility::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "followers" => Ok(Visibility::Followers),
            "private" => Ok(Visibility::Private),
            other => Err(format!(
                "'{}' is not a visibility (public, followers, private)",
                other
            )),
        }
    }
}

/// Entry of `/shelves` (my shelves with counts)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelfSummary {
    pub id: Id,
    pub name: String,
    pub is_system: bool,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub book_count: u32,
}

/// Shelf header without counts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelfInfo {
    pub id: Id,
    pub name: String,
    pub is_system: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

/// Book row of `/shelves/{id}/books`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShelfBook {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShelfBooks {
    pub shelf: ShelfInfo,
    pub books: Vec<ShelfBook>,
}

/// A shelf on someone else's profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserShelf {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub book_count: u32,
    #[serde(default)]
    pub books: Vec<ShelfBook>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelfOwner {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub is_private: bool,
}

/// Answer of `/users/{id}/shelves`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserShelves {
    pub user: ShelfOwner,
    pub shelves: Vec<UserShelf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_shelf_names_roundtrip() {
        for kind in SystemShelf::ALL {
            assert_eq!(SystemShelf::from_name(kind.name()), Some(kind));
        }
        assert_eq!(SystemShelf::from_name("favourites"), None);
    }

    #[test]
    fn test_read_shelf_maps_to_finished() {
        assert_eq!(
            SystemShelf::Read.reading_status(),
            ReadingStatus::Finished
        );
        assert_eq!(
            serde_json::to_string(&ReadingStatus::WantToRead).unwrap(),
            "\"want_to_read\""
        );
    }

    #[test]
    fn test_label_for_custom_and_system() {
        let system = ShelfState {
            id: 1,
            name: "want-to-read".into(),
            is_system: true,
            has_book: false,
            visibility: None,
        };
        let custom = ShelfState {
            id: 2,
            name: "reading".into(),
            is_system: false,
            has_book: false,
            visibility: None,
        };
        assert_eq!(system.label(), "Want to read");
        // Only system shelves get the fixed labels
        assert_eq!(custom.label(), "reading");
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!("followers".parse::<Visibility>(), Ok(Visibility::Followers));
        assert!("friends".parse::<Visibility>().is_err());
    }
}
