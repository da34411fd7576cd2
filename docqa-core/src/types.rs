//! Owned domain and wire types for the document Q&A client.
//!
//! Response structs mirror the JSON bodies the backend returns. Every field the
//! backend may omit carries `#[serde(default)]` so an older or newer server
//! still decodes; unknown keys are ignored.

use serde::{Deserialize, Serialize};

/// Where an analyzed document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Pdf,
    Url,
    /// Reported by the status endpoint before anything has been analyzed.
    #[default]
    #[serde(other)]
    Unknown,
}

impl SourceType {
    pub fn label(self) -> &'static str {
        match self {
            SourceType::Pdf => "PDF",
            SourceType::Url => "URL",
            SourceType::Unknown => "Unknown",
        }
    }
}

/// Descriptive facts about the analyzed document, as reported by the backend.
///
/// Immutable once received; a re-analysis replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub content_length: u64,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub page_count: Option<u64>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl Metadata {
    /// Label/value rows shown under the summary, in display order.
    ///
    /// Absent optional fields are skipped; counts use thousands separators
    /// (`Words: 1,200`).
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![("Source", self.source_type.label().to_owned())];
        if let Some(name) = &self.filename {
            rows.push(("File", name.clone()));
        }
        if let Some(title) = &self.title {
            rows.push(("Title", title.clone()));
        }
        if let Some(url) = &self.source_url {
            rows.push(("URL", url.clone()));
        }
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            rows.push(("Author", author.to_owned()));
        }
        if let Some(pages) = self.page_count {
            rows.push(("Pages", format_count(pages)));
        }
        rows.push(("Words", format_count(self.word_count)));
        if self.content_length > 0 {
            rows.push(("Characters", format_count(self.content_length)));
        }
        rows
    }

    /// Single-line rendering of [`display_rows`](Self::display_rows): `Source: PDF | Words: 1,200`.
    pub fn display_line(&self) -> String {
        self.display_rows()
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Formats an integer with `,` thousands separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Aggregate numbers the summary endpoint reports alongside the summary text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SummaryStatistics {
    #[serde(default)]
    pub total_characters: u64,
    #[serde(default)]
    pub total_words: u64,
    #[serde(default)]
    pub summary_length: u64,
}

/// The summary currently shown in the summary panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Markdown body; preferred for rendering when present.
    pub markdown: Option<String>,
    /// Plain-text body from servers that do not produce markdown.
    pub plain: Option<String>,
    pub metadata: Metadata,
    pub statistics: Option<SummaryStatistics>,
}

impl Summary {
    pub const EMPTY_TEXT: &'static str = "No summary available.";

    /// The body to render, as `(text, is_markdown)`.
    pub fn body(&self) -> (&str, bool) {
        if let Some(md) = self.markdown.as_deref().filter(|s| !s.trim().is_empty()) {
            return (md, true);
        }
        if let Some(plain) = self.plain.as_deref().filter(|s| !s.trim().is_empty()) {
            return (plain, false);
        }
        (Self::EMPTY_TEXT, false)
    }
}

/// A PDF selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct PdfUpload {
    pub filename: String,
    /// Declared MIME type; must be `application/pdf` to pass validation.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PdfUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One document-acquisition event: exactly one of a file or a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentInput {
    Pdf(PdfUpload),
    Url(String),
}

impl DocumentInput {
    /// Loads a PDF from disk; see [`load_pdf`](crate::validate::load_pdf).
    pub fn from_path(path: &std::path::Path) -> Result<Self, crate::error::ValidationError> {
        crate::validate::load_pdf(path).map(DocumentInput::Pdf)
    }

    /// Short description for the status line and logs.
    pub fn describe(&self) -> String {
        match self {
            DocumentInput::Pdf(pdf) => pdf.filename.clone(),
            DocumentInput::Url(url) => url.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// `POST /api/analyze` success body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub summary_markdown: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Present only on servers that pin questions to an explicit document id.
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/analyze/summary` success body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub summary_markdown: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub statistics: Option<SummaryStatistics>,
}

impl From<SummaryResponse> for Summary {
    fn from(r: SummaryResponse) -> Self {
        Summary {
            markdown: r.summary_markdown,
            plain: r.summary,
            metadata: r.metadata,
            statistics: r.statistics,
        }
    }
}

/// `POST /api/ask` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
}

/// `POST /api/ask` success body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub context_used: u32,
}

/// `GET /api/suggest` success body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// `GET /api/analyze/status` success body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// `POST /api/context` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextRequest {
    pub question: String,
    pub max_contexts: u8,
}

/// One retrieved passage from `POST /api/context`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContextSnippet {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub relevance_rank: u32,
}

/// `POST /api/context` success body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContextResponse {
    #[serde(default)]
    pub contexts: Vec<ContextSnippet>,
    #[serde(default)]
    pub total_contexts: usize,
}

/// `GET /health` body. Every field is optional; only the status code matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Error body shape shared by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}
