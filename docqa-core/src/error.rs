//! Error taxonomy for the document Q&A client.
//!
//! Two families exist: [`ValidationError`] never leaves the process (it is
//! raised before any request is built) and [`ApiError`] describes a request
//! that reached the transport. Neither is retried. Which surface shows an
//! error (modal, status line, chat bubble, banner, or only the log) is decided
//! by the workflow operation that produced it, not by the error type.

use thiserror::Error;

/// Largest PDF accepted for upload: 16 MiB.
pub const MAX_PDF_BYTES: u64 = 16 * 1024 * 1024;

/// Longest URL accepted for analysis.
pub const MAX_URL_LEN: usize = 2048;

/// Longest question accepted by the ask endpoint.
pub const MAX_QUESTION_LEN: usize = 1000;

/// Input rejected locally, before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a PDF file or provide a URL.")]
    EmptySource,

    #[error("Only PDF files are supported (got {content_type}).")]
    NotPdf { content_type: String },

    #[error("File is too large ({size} bytes). The maximum size is 16 MB.")]
    TooLarge { size: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Question is too long ({len} characters, maximum {max}).", max = MAX_QUESTION_LEN)]
    QuestionTooLong { len: usize },

    #[error("Could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// A request that was sent but did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx status. `message` is the body's `error` string when present.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Connection refused, DNS failure, TLS failure, transport timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// 2xx status with a body that does not match the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure to construct an [`HttpBackend`](crate::api::HttpBackend).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid backend URL '{url}': {reason}")]
    BadBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
