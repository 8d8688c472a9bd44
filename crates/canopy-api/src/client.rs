// Async HTTP client for the tracking service REST API.
//
// Base path: configurable, defaults to http://localhost:8080/api/
// Layout: /{collection}, /{collection}/{id}, /{collection}/{filter...}

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::collection::{Collection, Filter};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Characters of an unparseable body kept in the error message.
const PREVIEW_CHARS: usize = 200;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the tracking service.
///
/// Stateless apart from the configured `reqwest::Client`; every call is a
/// single request with no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL string and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers).
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        })
    }

    /// Ensure the base path ends with a slash so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The API root every collection hangs off.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append raw path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        if params.is_empty() {
            debug!("GET {url}");
        } else {
            debug!("GET {url} params={params:?}");
        }

        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(|e| self.transport_error(e))?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = body
                    .char_indices()
                    .nth(PREVIEW_CHARS)
                    .map_or(body.as_str(), |(end, _)| &body[..end]);
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let path = resp.url().path().to_owned();
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .or_else(|| (!raw.trim().is_empty()).then(|| raw.clone()));

        match status.as_u16() {
            404 => Error::NotFound { path },
            400 | 422 => Error::Validation {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| status.to_string()),
            },
            code => Error::Server {
                status: code,
                status_text: status.canonical_reason().unwrap_or("Unknown").to_owned(),
                message,
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Collections ──────────────────────────────────────────────────

    /// `GET /{collection}`
    pub async fn list<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, Error> {
        self.get(&[collection.as_ref()], &[]).await
    }

    /// `GET /{collection}/{filter...}`
    pub async fn list_filtered<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<T>, Error> {
        let mut segments = vec![collection.as_ref()];
        segments.extend(filter.segments());
        self.get(&segments, &filter.query()).await
    }

    /// `GET /{collection}/{id}`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: u64,
    ) -> Result<T, Error> {
        let id = id.to_string();
        self.get(&[collection.as_ref(), &id], &[]).await
    }

    /// `POST /{collection}`
    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        collection: Collection,
        body: &B,
    ) -> Result<T, Error> {
        self.post(&[collection.as_ref()], body).await
    }

    /// `PUT /{collection}/{id}`
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        collection: Collection,
        id: u64,
        body: &B,
    ) -> Result<T, Error> {
        let id = id.to_string();
        self.put(&[collection.as_ref(), &id], body).await
    }

    /// `DELETE /{collection}/{id}`
    pub async fn remove(&self, collection: Collection, id: u64) -> Result<(), Error> {
        let id = id.to_string();
        self.delete(&[collection.as_ref(), &id]).await
    }

    // ── Auth ─────────────────────────────────────────────────────────

    /// POST to an `/auth/*` endpoint, turning every rejection into
    /// `Error::Authentication` with the server's message when it sent one.
    pub(crate) async fn post_auth<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, Error> {
        match self.post(&["auth", endpoint], body).await {
            Err(
                Error::Validation { message, .. }
                | Error::Authentication { message }
                | Error::Server {
                    message: Some(message),
                    ..
                },
            ) => Err(Error::Authentication { message }),
            Err(Error::Server { .. } | Error::NotFound { .. }) => Err(Error::Authentication {
                message: "Authentication failed".into(),
            }),
            other => other,
        }
    }
}
