//! Scripted in-memory backend shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use docqa_core::api::Backend;
use docqa_core::error::{ApiError, ApiResult};
use docqa_core::types::{
    AnalyzeResponse, AskRequest, AskResponse, ContextRequest, ContextResponse, DocumentInput,
    HealthResponse, Metadata, SourceType, StatusResponse, SuggestResponse, SummaryResponse,
};

fn unscripted<T>() -> ApiResult<T> {
    Err(ApiError::Network("not scripted".to_owned()))
}

/// Returns the scripted result for every call of an endpoint and records the call.
pub struct FakeBackend {
    pub analyze: Mutex<ApiResult<AnalyzeResponse>>,
    pub summary: Mutex<ApiResult<SummaryResponse>>,
    pub ask: Mutex<ApiResult<AskResponse>>,
    pub suggest: Mutex<ApiResult<SuggestResponse>>,
    pub status: Mutex<ApiResult<StatusResponse>>,
    pub context: Mutex<ApiResult<ContextResponse>>,
    pub health: Mutex<ApiResult<HealthResponse>>,
    calls: Mutex<Vec<&'static str>>,
    asked: Mutex<Vec<AskRequest>>,
    summary_ids: Mutex<Vec<Option<String>>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            analyze: Mutex::new(unscripted()),
            summary: Mutex::new(unscripted()),
            ask: Mutex::new(unscripted()),
            suggest: Mutex::new(unscripted()),
            status: Mutex::new(unscripted()),
            context: Mutex::new(unscripted()),
            health: Mutex::new(unscripted()),
            calls: Mutex::new(Vec::new()),
            asked: Mutex::new(Vec::new()),
            summary_ids: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T>(slot: &Mutex<ApiResult<T>>, value: ApiResult<T>) {
        *slot.lock().unwrap() = value;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn asked(&self) -> Vec<AskRequest> {
        self.asked.lock().unwrap().clone()
    }

    pub fn summary_ids(&self) -> Vec<Option<String>> {
        self.summary_ids.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn analyze(&self, _input: &DocumentInput) -> ApiResult<AnalyzeResponse> {
        self.record("analyze");
        self.analyze.lock().unwrap().clone()
    }

    async fn summary(&self, doc_id: Option<&str>) -> ApiResult<SummaryResponse> {
        self.record("summary");
        self.summary_ids.lock().unwrap().push(doc_id.map(str::to_owned));
        self.summary.lock().unwrap().clone()
    }

    async fn ask(&self, request: &AskRequest) -> ApiResult<AskResponse> {
        self.record("ask");
        self.asked.lock().unwrap().push(request.clone());
        self.ask.lock().unwrap().clone()
    }

    async fn suggestions(&self) -> ApiResult<SuggestResponse> {
        self.record("suggest");
        self.suggest.lock().unwrap().clone()
    }

    async fn status(&self) -> ApiResult<StatusResponse> {
        self.record("status");
        self.status.lock().unwrap().clone()
    }

    async fn context(&self, _request: &ContextRequest) -> ApiResult<ContextResponse> {
        self.record("context");
        self.context.lock().unwrap().clone()
    }

    async fn health(&self) -> ApiResult<HealthResponse> {
        self.record("health");
        self.health.lock().unwrap().clone()
    }
}

pub fn pdf_metadata(words: u64) -> Metadata {
    Metadata {
        source_type: SourceType::Pdf,
        word_count: words,
        filename: Some("report.pdf".to_owned()),
        ..Default::default()
    }
}

pub fn analyzed(summary_md: &str, metadata: Metadata) -> AnalyzeResponse {
    AnalyzeResponse {
        summary_markdown: Some(summary_md.to_owned()),
        metadata,
        ..Default::default()
    }
}

pub fn suggestions(items: &[&str]) -> SuggestResponse {
    SuggestResponse { suggestions: items.iter().map(|s| s.to_string()).collect() }
}

pub fn http(status: u16, message: &str) -> ApiError {
    ApiError::Http { status, message: message.to_owned() }
}
