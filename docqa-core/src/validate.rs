//! Client-side validation that runs before any request is built.
//!
//! Everything here is synchronous and side-effect free except [`load_pdf`],
//! which stats the file before reading it so an oversized upload is rejected
//! without pulling 16+ MiB into memory.

use std::path::Path;

use url::Url;

use crate::error::{ValidationError, MAX_PDF_BYTES, MAX_QUESTION_LEN, MAX_URL_LEN};
use crate::types::{DocumentInput, PdfUpload};

pub const PDF_MIME: &str = "application/pdf";

/// Checks a declared content type and size against the upload constraints.
pub fn check_pdf(content_type: &str, size: u64) -> Result<(), ValidationError> {
    if !content_type.eq_ignore_ascii_case(PDF_MIME) {
        return Err(ValidationError::NotPdf { content_type: content_type.to_owned() });
    }
    if size > MAX_PDF_BYTES {
        return Err(ValidationError::TooLarge { size });
    }
    Ok(())
}

/// Validates an in-memory upload.
pub fn validate_pdf(pdf: &PdfUpload) -> Result<(), ValidationError> {
    check_pdf(&pdf.content_type, pdf.bytes.len() as u64)
}

/// Validates and normalises a URL for the analyze endpoint.
///
/// Accepts only `http`/`https` URLs of at most 2048 characters whose host
/// contains a dot. Returns the trimmed input on success.
pub fn validate_url(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptySource);
    }
    if trimmed.len() > MAX_URL_LEN {
        return Err(ValidationError::InvalidUrl(format!(
            "longer than {MAX_URL_LEN} characters"
        )));
    }
    let parsed = Url::parse(trimmed).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    match parsed.host_str() {
        Some(host) if host.contains('.') => Ok(trimmed.to_owned()),
        _ => Err(ValidationError::InvalidUrl("missing or incomplete host".to_owned())),
    }
}

/// Trims a question. `Ok(None)` means "nothing to send" and is not an error.
pub fn normalize_question(raw: &str) -> Result<Option<String>, ValidationError> {
    let q = raw.trim();
    if q.is_empty() {
        return Ok(None);
    }
    let len = q.chars().count();
    if len > MAX_QUESTION_LEN {
        return Err(ValidationError::QuestionTooLong { len });
    }
    Ok(Some(q.to_owned()))
}

/// MIME type implied by a file's extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME,
        _ => "application/octet-stream",
    }
}

/// Reads a PDF from disk, rejecting wrong types and oversized files first.
pub fn load_pdf(path: &Path) -> Result<PdfUpload, ValidationError> {
    let unreadable = |e: std::io::Error| ValidationError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    let content_type = content_type_for(path);
    let size = std::fs::metadata(path).map_err(unreadable)?.len();
    check_pdf(content_type, size)?;
    let bytes = std::fs::read(path).map_err(unreadable)?;
    // The file may have grown between stat and read.
    check_pdf(content_type, bytes.len() as u64)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_owned());
    Ok(PdfUpload { filename, content_type: content_type.to_owned(), bytes })
}

/// Interprets free-form source text typed or pasted by the user.
///
/// `http://` / `https://` prefixes select a URL; anything else is a file path.
/// Surrounding quotes and a `file://` prefix (both common when a file is
/// dropped onto a terminal) are stripped.
pub fn parse_source(raw: &str) -> Result<DocumentInput, ValidationError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ValidationError::EmptySource);
    }
    let lower = s.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return validate_url(s).map(DocumentInput::Url);
    }
    let unquoted = s
        .strip_prefix('\'')
        .and_then(|r| r.strip_suffix('\''))
        .or_else(|| s.strip_prefix('"').and_then(|r| r.strip_suffix('"')))
        .unwrap_or(s);
    let path = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    DocumentInput::from_path(Path::new(path))
}
