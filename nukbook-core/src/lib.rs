//! nukBook Core Library
//!
//! Typed client for the nukBook REST API plus the client-side state the web
//! front end keeps: the session token, per-book shelf membership with
//! optimistic toggles, debounced lookups, recent searches and the admin
//! tables. Every call goes through [`ApiClient`]; every view-level failure is
//! classified by [`ErrorGuard`] or reported through a [`NoticeBus`].

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod guard;
pub mod lookup;
pub mod nav;
pub mod notice;
pub mod optimistic;
pub mod session;
pub mod shelves;
pub mod social;
pub mod storage;
pub mod types;

pub use auth::TokenStore;
pub use client::{ApiClient, Auth, Upload};
pub use config::{ApiMode, ClientConfig};
pub use error::{ApiError, ErrorClass, NukbookError, Result, StorageError, NO_TOKEN};
pub use guard::{Disposition, ErrorGuard, GuardOptions};
pub use nav::Redirect;
pub use notice::{Notice, NoticeBus, NoticeKind};
pub use shelves::{ShelfEvent, ShelfStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::Id;
