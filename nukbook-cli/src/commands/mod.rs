//! CLI command implementations

mod admin;
mod catalog;
mod session;
mod shelves;
mod social;

pub use admin::{admin, AdminCommand};
pub use catalog::{author, book, recent, recommend, review, search, timeline};
pub use session::{login, logout, register, whoami};
pub use shelves::{shelves, ShelvesCommand};
pub use social::{compare, feed, follow, notifications, privacy, profile, requests};

use anyhow::anyhow;
use nukbook_core::{ErrorClass, NukbookError};

/// Turn session failures into a hint the user can act on
pub(crate) fn explain(err: NukbookError) -> anyhow::Error {
    match err.class() {
        ErrorClass::Unauthenticated => anyhow!("Not logged in. Run `nukbook login` first."),
        ErrorClass::Forbidden => anyhow!("Not allowed: {}", err),
        _ => anyhow::Error::new(err),
    }
}
