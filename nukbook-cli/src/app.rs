//! Shared state of one CLI invocation

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use nukbook_core::config::{ENV_API_INTERNAL_URL, ENV_API_URL, ENV_DATA_DIR};
use nukbook_core::{
    ApiClient, ApiMode, ClientConfig, KeyValueStore, Notice, NoticeBus, NoticeKind,
    TokenStore,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Public base URL of the API
    #[arg(long, global = true, env = ENV_API_URL, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Internal base URL, used with --internal
    #[arg(long, global = true, env = ENV_API_INTERNAL_URL)]
    pub internal_url: Option<String>,

    /// Talk to the internal URL (inside the deployment)
    #[arg(long, global = true)]
    pub internal: bool,

    /// Where the session token and recent searches are kept
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// `<data dir>/nukbook`, or `./nukbook_data` when the platform has none
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("nukbook"))
        .unwrap_or_else(|| PathBuf::from("nukbook_data"))
}

pub struct App {
    pub client: ApiClient,
    pub store: Arc<dyn KeyValueStore>,
    pub notices: NoticeBus,
    pub json: bool,
    notice_rx: broadcast::Receiver<Notice>,
}

impl App {
    pub fn open(opts: &GlobalOpts) -> Result<Self> {
        let data_dir = opts.data_dir.clone().unwrap_or_else(default_data_dir);
        tracing::debug!(data_dir = %data_dir.display(), "Using data directory");

        let mut config = ClientConfig::new(opts.api_url.clone()).with_data_dir(data_dir);
        if let Some(internal) = &opts.internal_url {
            config = config.with_internal_url(internal.clone());
        }
        if opts.internal {
            config = config.with_mode(ApiMode::Server);
        }

        let store: Arc<dyn KeyValueStore> = Arc::new(
            config
                .file_store()
                .context("No data directory configured")?,
        );
        let tokens = TokenStore::new(store.clone());
        let client = ApiClient::new(config, tokens).context("Failed to build HTTP client")?;

        let notices = NoticeBus::new();
        let notice_rx = notices.subscribe();

        Ok(Self {
            client,
            store,
            notices,
            json: opts.json,
            notice_rx,
        })
    }

    /// Spinner on stderr; hidden for JSON output
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print queued notices to stderr
    pub fn flush_notices(&mut self) {
        while let Ok(notice) = self.notice_rx.try_recv() {
            match notice.kind {
                NoticeKind::Error => eprintln!("error: {}", notice.message),
                _ => eprintln!("{}", notice.message),
            }
        }
    }

    /// Resolve a media path for display
    pub fn media(&self, path: Option<&str>) -> Option<String> {
        nukbook_core::format::media_url(self.client.config().base_url(ApiMode::Browser), path)
    }
}
