//! HTTP contract with the document-processing backend.
//!
//! [`Backend`] is the seam between the workflow and the network: the TUI
//! talks to an [`HttpBackend`], tests talk to an in-memory fake. Every method
//! is one request; nothing here retries, caches, or sequences calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ApiResult, ClientError};
use crate::types::{
    AnalyzeResponse, AskRequest, AskResponse, ContextRequest, ContextResponse, DocumentInput,
    ErrorBody, HealthResponse, StatusResponse, SuggestResponse, SummaryResponse,
};

/// The backend operations the workflow depends on.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/analyze` with a multipart `pdf` field or a JSON `{url}` body.
    async fn analyze(&self, input: &DocumentInput) -> ApiResult<AnalyzeResponse>;

    /// `GET /api/analyze/summary`, pinned to `doc_id` when one is known.
    async fn summary(&self, doc_id: Option<&str>) -> ApiResult<SummaryResponse>;

    /// `POST /api/ask`.
    async fn ask(&self, request: &AskRequest) -> ApiResult<AskResponse>;

    /// `GET /api/suggest`.
    async fn suggestions(&self) -> ApiResult<SuggestResponse>;

    /// `GET /api/analyze/status`.
    async fn status(&self) -> ApiResult<StatusResponse>;

    /// `POST /api/context`.
    async fn context(&self, request: &ContextRequest) -> ApiResult<ContextResponse>;

    /// `GET /health`. Any 2xx is healthy; the body is optional.
    async fn health(&self) -> ApiResult<HealthResponse>;
}

/// [`Backend`] over reqwest.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base: Url,
}

impl HttpBackend {
    /// Builds a client rooted at `base_url` (e.g. `http://localhost:5000`).
    ///
    /// `timeout` of `None` leaves reqwest's default (no overall timeout).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url.trim()).map_err(|e| ClientError::BadBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut builder = Client::builder().user_agent(concat!("docqa/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self { http: builder.build()?, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Network(format!("bad endpoint {path}: {e}")))
    }
}

/// Builds the error for a non-2xx response from its raw body.
///
/// Uses the body's `error` string verbatim, then `message`, then `HTTP <code>`.
pub fn http_error(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));
    ApiError::Http { status, message }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if !status.is_success() {
        return Err(http_error(status.as_u16(), &body));
    }
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn analyze(&self, input: &DocumentInput) -> ApiResult<AnalyzeResponse> {
        let url = self.endpoint("api/analyze")?;
        debug!(%url, source = %input.describe(), "analyze");
        let request = match input {
            DocumentInput::Pdf(pdf) => {
                let part = Part::bytes(pdf.bytes.clone())
                    .file_name(pdf.filename.clone())
                    .mime_str(&pdf.content_type)?;
                self.http.post(url).multipart(Form::new().part("pdf", part))
            }
            DocumentInput::Url(u) => self.http.post(url).json(&serde_json::json!({ "url": u })),
        };
        decode(request.send().await?).await
    }

    async fn summary(&self, doc_id: Option<&str>) -> ApiResult<SummaryResponse> {
        let mut url = self.endpoint("api/analyze/summary")?;
        if let Some(id) = doc_id {
            url.query_pairs_mut().append_pair("doc_id", id);
        }
        debug!(%url, "summary");
        decode(self.http.get(url).send().await?).await
    }

    async fn ask(&self, request: &AskRequest) -> ApiResult<AskResponse> {
        let url = self.endpoint("api/ask")?;
        debug!(%url, len = request.question.len(), "ask");
        decode(self.http.post(url).json(request).send().await?).await
    }

    async fn suggestions(&self) -> ApiResult<SuggestResponse> {
        let url = self.endpoint("api/suggest")?;
        debug!(%url, "suggest");
        decode(self.http.get(url).send().await?).await
    }

    async fn status(&self) -> ApiResult<StatusResponse> {
        let url = self.endpoint("api/analyze/status")?;
        debug!(%url, "status");
        decode(self.http.get(url).send().await?).await
    }

    async fn context(&self, request: &ContextRequest) -> ApiResult<ContextResponse> {
        let url = self.endpoint("api/context")?;
        debug!(%url, max = request.max_contexts, "context");
        decode(self.http.post(url).json(request).send().await?).await
    }

    async fn health(&self) -> ApiResult<HealthResponse> {
        let url = self.endpoint("health")?;
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            return Err(http_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_slice(&body).unwrap_or_default())
    }
}
