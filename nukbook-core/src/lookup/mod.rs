//! Debounced lookups behind text inputs
//!
//! A [`DebouncedLookup`] owns a small worker task. Text goes in through
//! [`DebouncedLookup::set_query`]; the current [`LookupState`] comes out of a
//! `watch` channel. Every input gets a sequence number and an answer is only
//! applied while its number is still the latest, so a slow response for an
//! old query never overwrites a newer one.

mod cursor;
mod picker;
mod recent;
mod search;

pub use cursor::SelectionCursor;
pub use picker::{AdminLookup, LookupKind, Picker, PickerOption, PICKER_LIMIT};
pub use recent::{push_recent, RecentItem, RecentKind, RecentSearches, RECENT_KEY, RECENT_LIMIT};
pub use search::{flatten_results, SearchSource, SEARCH_LIMIT};

use crate::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// How long to wait and how much to type before looking something up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    pub min_len: usize,
    pub delay: Duration,
    /// Empty input still triggers a lookup (list filters)
    pub allow_empty: bool,
}

impl QueryPolicy {
    /// Navigation search box
    pub const SEARCH: QueryPolicy = QueryPolicy {
        min_len: 2,
        delay: Duration::from_millis(300),
        allow_empty: false,
    };

    /// Author/genre/tag pickers
    pub const PICKER: QueryPolicy = QueryPolicy {
        min_len: 1,
        delay: Duration::from_millis(250),
        allow_empty: false,
    };

    /// Admin table search field
    pub const FILTER: QueryPolicy = QueryPolicy {
        min_len: 0,
        delay: Duration::from_millis(250),
        allow_empty: true,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupState<T> {
    /// Nothing typed
    Idle,
    /// Too short to look up
    Hint { min_len: usize },
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LookupState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LookupState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// "Type at least 2 characters to search."
pub fn hint_message(min_len: usize) -> String {
    let unit = if min_len == 1 { "character" } else { "characters" };
    format!("Type at least {} {} to search.", min_len, unit)
}

/// Something that answers queries
#[async_trait]
pub trait LookupSource: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    async fn lookup(&self, query: &str) -> Result<Self::Output>;

    /// An answer known without asking the server
    fn immediate(&self, _query: &str) -> Option<Self::Output> {
        None
    }
}

enum Plan<T> {
    Settled(LookupState<T>),
    Fetch(String),
}

fn plan<S: LookupSource>(source: &S, policy: &QueryPolicy, text: &str) -> Plan<S::Output> {
    let query = text.trim();
    if query.is_empty() && !policy.allow_empty {
        return Plan::Settled(LookupState::Idle);
    }
    if query.chars().count() < policy.min_len {
        return Plan::Settled(LookupState::Hint {
            min_len: policy.min_len,
        });
    }
    if let Some(answer) = source.immediate(query) {
        return Plan::Settled(LookupState::Ready(answer));
    }
    Plan::Fetch(query.to_string())
}

struct Input {
    seq: u64,
    /// `None` when the input settles locally
    query: Option<String>,
}

/// Debounced, sequence-checked lookups for one input field
pub struct DebouncedLookup<S: LookupSource> {
    source: Arc<S>,
    policy: QueryPolicy,
    input: mpsc::UnboundedSender<Input>,
    state: Arc<watch::Sender<LookupState<S::Output>>>,
    issued: Arc<AtomicU64>,
    worker: JoinHandle<()>,
}

impl<S: LookupSource> DebouncedLookup<S> {
    /// Start the worker; must be called inside a tokio runtime
    pub fn new(source: S, policy: QueryPolicy) -> Self {
        let source = Arc::new(source);
        let (input, rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(LookupState::Idle);
        let state = Arc::new(state);
        let issued = Arc::new(AtomicU64::new(0));

        let worker = tokio::spawn(run(
            source.clone(),
            policy,
            rx,
            state.clone(),
            issued.clone(),
        ));

        Self {
            source,
            policy,
            input,
            state,
            issued,
            worker,
        }
    }

    pub fn policy(&self) -> QueryPolicy {
        self.policy
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Feed the latest text of the field
    pub fn set_query(&self, text: &str) {
        let (next, query) = match plan(self.source.as_ref(), &self.policy, text) {
            Plan::Settled(state) => (state, None),
            Plan::Fetch(query) => (LookupState::Loading, Some(query)),
        };
        let seq = publish(&self.state, &self.issued, next);
        if self.input.send(Input { seq, query }).is_err() {
            tracing::warn!("Lookup worker is gone");
        }
    }

    pub fn state(&self) -> LookupState<S::Output> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState<S::Output>> {
        self.state.subscribe()
    }

    /// Wait until the current input has an answer
    pub async fn settled(&self) -> LookupState<S::Output> {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }
}

impl<S: LookupSource> Drop for DebouncedLookup<S> {
    fn drop(&mut self) {
        // In-flight answers see a newer number and are discarded
        self.state.send_if_modified(|_| {
            self.issued.fetch_add(1, Ordering::SeqCst);
            false
        });
        self.worker.abort();
    }
}

/// Bump the sequence number and publish `next` under the channel's write lock
fn publish<T>(state: &watch::Sender<LookupState<T>>, issued: &AtomicU64, next: LookupState<T>) -> u64 {
    let mut seq = 0;
    state.send_modify(|current| {
        seq = issued.fetch_add(1, Ordering::SeqCst) + 1;
        *current = next;
    });
    seq
}

/// Write an answer only while `seq` is still the latest input
///
/// The check runs under the same lock [`publish`] takes, so a newer input
/// cannot slip in between the check and the write.
fn apply_if_current<T>(
    state: &watch::Sender<LookupState<T>>,
    issued: &AtomicU64,
    seq: u64,
    answer: LookupState<T>,
) -> bool {
    state.send_if_modified(|current| {
        if issued.load(Ordering::SeqCst) != seq {
            return false;
        }
        *current = answer;
        true
    })
}

async fn run<S: LookupSource>(
    source: Arc<S>,
    policy: QueryPolicy,
    mut rx: mpsc::UnboundedReceiver<Input>,
    state: Arc<watch::Sender<LookupState<S::Output>>>,
    issued: Arc<AtomicU64>,
) {
    let mut pending: Option<Input> = None;

    loop {
        let input = match pending.take() {
            Some(input) => input,
            None => match rx.recv().await {
                Some(input) => input,
                None => break,
            },
        };

        let Some(query) = input.query else {
            continue;
        };

        // Quiet period: any newer input restarts it
        match tokio::time::timeout(policy.delay, rx.recv()).await {
            Ok(Some(newer)) => {
                pending = Some(newer);
                continue;
            }
            Ok(None) => break,
            Err(_) => {}
        }

        let source = source.clone();
        let state = state.clone();
        let issued = issued.clone();
        let seq = input.seq;
        tokio::spawn(async move {
            tracing::debug!(seq, query = %query, "Lookup");
            let answer = match source.lookup(&query).await {
                Ok(value) => LookupState::Ready(value),
                Err(e) => LookupState::Failed(e.to_string()),
            };
            if !apply_if_current(&state, &issued, seq, answer) {
                tracing::debug!(seq, "Discarding stale lookup answer");
            }
        });
    }
}
