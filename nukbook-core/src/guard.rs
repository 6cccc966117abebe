//! Turning request failures into what a page should do next
//!
//! Every admin page and picker routes its errors through [`ErrorGuard`]: a
//! dead session clears the token and sends the user to the login page with a
//! way back, a forbidden answer sends them home, anything else becomes a
//! message to show.

use crate::auth::TokenStore;
use crate::error::{ErrorClass, NukbookError};
use crate::nav::Redirect;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardOptions {
    /// Treat 404 as success (deleting something already gone)
    pub ignore_not_found: bool,
}

impl GuardOptions {
    pub fn ignore_not_found() -> Self {
        Self {
            ignore_not_found: true,
        }
    }
}

/// What to do with a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Redirect(Redirect),
    Message(String),
    /// Nothing to report
    Ignored,
}

/// Pure classification, without touching the token store
pub fn classify(err: &NukbookError, return_to: &str, options: GuardOptions) -> Disposition {
    match err.class() {
        ErrorClass::Unauthenticated => Disposition::Redirect(Redirect::login(return_to)),
        ErrorClass::Forbidden => Disposition::Redirect(Redirect::Home),
        ErrorClass::NotFound if options.ignore_not_found => Disposition::Ignored,
        _ => Disposition::Message(err.to_string()),
    }
}

#[derive(Clone)]
pub struct ErrorGuard {
    tokens: TokenStore,
    return_to: String,
}

impl ErrorGuard {
    /// `return_to` is the path the login page should send the user back to
    pub fn new(tokens: TokenStore, return_to: impl Into<String>) -> Self {
        Self {
            tokens,
            return_to: return_to.into(),
        }
    }

    pub fn return_to(&self) -> &str {
        &self.return_to
    }

    pub async fn resolve(&self, err: &NukbookError, options: GuardOptions) -> Disposition {
        let disposition = classify(err, &self.return_to, options);
        if let Disposition::Redirect(Redirect::Login { .. }) = &disposition {
            tracing::info!(return_to = %self.return_to, "Session missing, redirecting to login");
            self.tokens.clear().await;
        }
        disposition
    }
}
