//! Client configuration read from the environment

use crate::storage::FileStore;
use std::path::PathBuf;

/// Public API base URL (what a browser would reach)
pub const ENV_API_URL: &str = "NUKBOOK_API_URL";

/// Internal API base URL (reachable only from inside the deployment)
pub const ENV_API_INTERNAL_URL: &str = "NUKBOOK_API_INTERNAL_URL";

/// Directory used for the persistent key/value store
pub const ENV_DATA_DIR: &str = "NUKBOOK_DATA_DIR";

/// Where a call is made from, which decides the base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiMode {
    /// Inside the deployment: internal URL, no TLS
    Server,
    /// From the outside: public URL
    #[default]
    Browser,
}

/// Base URLs and storage location for a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub public_url: String,
    pub internal_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub mode: ApiMode,
}

impl ClientConfig {
    /// Config with a single base URL used for every mode
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: trim_base(public_url.into()),
            ..Self::default()
        }
    }

    /// Read `NUKBOOK_API_URL`, `NUKBOOK_API_INTERNAL_URL` and `NUKBOOK_DATA_DIR`
    pub fn from_env() -> Self {
        let public_url = std::env::var(ENV_API_URL).unwrap_or_default();
        let internal_url = std::env::var(ENV_API_INTERNAL_URL)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(trim_base);
        let data_dir = std::env::var(ENV_DATA_DIR).ok().map(PathBuf::from);

        Self {
            public_url: trim_base(public_url),
            internal_url,
            data_dir,
            mode: ApiMode::Browser,
        }
    }

    pub fn with_mode(mut self, mode: ApiMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_internal_url(mut self, url: impl Into<String>) -> Self {
        self.internal_url = Some(trim_base(url.into()));
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Persistent store rooted at the configured data directory
    pub fn file_store(&self) -> Option<FileStore> {
        self.data_dir.clone().map(FileStore::new)
    }

    /// Base URL for the given mode
    ///
    /// Server mode prefers the internal URL and falls back to the public one.
    pub fn base_url(&self, mode: ApiMode) -> &str {
        match mode {
            ApiMode::Server => self.internal_url.as_deref().unwrap_or(&self.public_url),
            ApiMode::Browser => &self.public_url,
        }
    }

    /// Base URL for the configured mode
    pub fn active_base_url(&self) -> &str {
        self.base_url(self.mode)
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
