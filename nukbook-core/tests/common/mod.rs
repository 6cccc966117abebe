//! In-process stand-in for the nukBook API
//!
//! Routes are canned `(method, path) -> (status, body)` answers registered by
//! each test. Every request is recorded. A route can be held until the test
//! releases it, which makes the optimistic state observable.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use nukbook_core::{ApiClient, ClientConfig, MemoryStore, TokenStore};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
    pub body: String,
}

impl Call {
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Clone)]
enum Canned {
    Json(StatusCode, Value),
    Empty(StatusCode),
    Text(StatusCode, String),
}

type Key = (Method, String);

#[derive(Default)]
struct Fake {
    routes: Mutex<HashMap<Key, Canned>>,
    gates: Mutex<HashMap<Key, Arc<Semaphore>>>,
    calls: Mutex<Vec<Call>>,
}

pub struct FakeApi {
    pub base: String,
    fake: Arc<Fake>,
}

impl FakeApi {
    pub async fn start() -> Self {
        let fake = Arc::new(Fake::default());
        let app = Router::new().fallback(handle).with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base: format!("http://{}", addr),
            fake,
        }
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.fake
            .routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Canned::Json(status, body));
        self
    }

    pub fn on_empty(&self, method: Method, path: &str, status: u16) -> &Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.fake
            .routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Canned::Empty(status));
        self
    }

    pub fn on_text(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.fake
            .routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Canned::Text(status, body.to_string()));
        self
    }

    /// Hold answers on this route until permits are added
    pub fn hold(&self, method: Method, path: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.fake
            .gates
            .lock()
            .unwrap()
            .insert((method, path.to_string()), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.fake.calls.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(Call::line).collect()
    }

    /// Client against this server with a fresh token store
    pub async fn client(&self, token: Option<&str>) -> ApiClient {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        if let Some(token) = token {
            tokens.set(token).await.unwrap();
        }
        ApiClient::new(ClientConfig::new(self.base.clone()), tokens).unwrap()
    }
}

async fn handle(
    State(fake): State<Arc<Fake>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    fake.calls.lock().unwrap().push(Call {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        bearer,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let key = (method, path);
    let gate = fake.gates.lock().unwrap().get(&key).cloned();
    if let Some(gate) = gate {
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }

    let canned = fake.routes.lock().unwrap().get(&key).cloned();
    match canned {
        Some(Canned::Json(status, value)) => (status, axum::Json(value)).into_response(),
        Some(Canned::Empty(status)) => status.into_response(),
        Some(Canned::Text(status, text)) => (status, text).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({"detail": "Not Found"})),
        )
            .into_response(),
    }
}

/// `{id, name, is_system, has_book}`
pub fn shelf(id: i64, name: &str, is_system: bool, has_book: bool) -> Value {
    json!({"id": id, "name": name, "is_system": is_system, "has_book": has_book})
}
