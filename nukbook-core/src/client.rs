//! HTTP/JSON client for the nukBook API

use crate::auth::TokenStore;
use crate::config::ClientConfig;
use crate::error::{ApiError, NukbookError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use reqwest::Method;

/// Placeholder for requests without a JSON body
pub const NO_BODY: Option<&'static ()> = None;

/// Whether a call needs the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Send the token if there is one
    Optional,
    /// Fail with `NO_TOKEN` before touching the network when logged out
    Required,
}

/// A file to send as the `file` field of a multipart form
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// Typed access to the REST API
///
/// Cheap to clone; clones share the connection pool and the token store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(config: ClientConfig, tokens: TokenStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("nukbook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.active_base_url(), path)
    }

    /// `GET path` and decode the JSON answer
    pub async fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T> {
        let response = self.execute(Method::GET, path, NO_BODY, auth).await?;
        decode(response).await
    }

    /// `POST|PUT|PATCH|DELETE path` with an optional JSON body, decoding the answer
    ///
    /// A 204 or non-JSON answer decodes as an empty JSON object.
    pub async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(method, path, body, auth).await?;
        decode(response).await
    }

    /// Like [`ApiClient::send`] but ignores whatever the server answers on success
    pub async fn send_empty<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, body, auth).await?;
        Ok(())
    }

    /// Multipart upload to a media endpoint; always requires the token
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, upload: Upload) -> Result<T> {
        let token = self.tokens.require().await?;

        let mut part =
            reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.file_name.clone());
        if let Some(mime) = &upload.mime {
            part = part.mime_str(mime)?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!(path, file = %upload.file_name, "POST multipart");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let response = self.check(&Method::POST, path, response).await?;
        decode(response).await
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let token = match auth {
            Auth::Required => Some(self.tokens.require().await?),
            Auth::Optional => self.tokens.get().await,
        };

        let mut request: RequestBuilder = self.http.request(method.clone(), self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(method = %method, path, "API request");
        let response = request.send().await?;
        self.check(&method, path, response).await
    }

    /// Turn non-2xx answers into `ApiError`, dropping the token on 401
    async fn check(&self, method: &Method, path: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(path, "Session rejected, clearing token");
            self.tokens.clear().await;
        }

        let detail = read_error(response).await;
        let err = ApiError::for_request(method.as_str(), path, status.as_u16(), &detail);
        tracing::debug!("{}", err);
        Err(NukbookError::Api(err))
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    if response.status() == StatusCode::NO_CONTENT || !is_json(&response) {
        return Ok(serde_json::from_value(serde_json::Value::Object(
            serde_json::Map::new(),
        ))?);
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Extract the most useful message from an error answer
///
/// JSON bodies yield their `detail` string, or the whole body re-serialized;
/// anything else yields the raw text.
async fn read_error(response: Response) -> String {
    if is_json(&response) {
        match response.json::<serde_json::Value>().await {
            Ok(data) => error_detail(&data),
            Err(_) => String::new(),
        }
    } else {
        response.text().await.unwrap_or_default()
    }
}

fn error_detail(data: &serde_json::Value) -> String {
    match data.get("detail") {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        _ => data.to_string(),
    }
}

/// Append URL-encoded query parameters to a path, skipping `None` values
pub fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect();

    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, pairs.join("&"))
    }
}
