//! The single active-document record held by the workflow.

use crate::chat::ChatLog;
use crate::types::{AnalyzeResponse, Metadata, Summary};

/// Ordered candidate questions, replaced wholesale on every fetch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuggestionSet {
    items: Vec<String>,
    pub visible: bool,
}

impl SuggestionSet {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn replace(&mut self, items: Vec<String>) {
        self.items = items
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.visible = false;
    }
}

/// At most one document context per process.
///
/// `epoch` increases on every [`clear`](Session::clear); requests tagged with
/// an older epoch belong to a document that is no longer shown.
#[derive(Debug, Default)]
pub struct Session {
    pub document_ready: bool,
    pub last_metadata: Option<Metadata>,
    /// Explicit document id, only when the server issues one.
    pub doc_id: Option<String>,
    pub summary: Option<Summary>,
    pub chat: ChatLog,
    pub suggestions: SuggestionSet,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Drops the document, summary, chat and suggestions.
    pub fn clear(&mut self) {
        self.document_ready = false;
        self.last_metadata = None;
        self.doc_id = None;
        self.summary = None;
        self.chat.clear();
        self.suggestions.clear();
        self.epoch += 1;
    }

    /// Populates the session from a successful analyze response.
    pub fn attach(&mut self, resp: AnalyzeResponse) {
        self.doc_id = resp.doc_id.filter(|id| !id.is_empty());
        self.last_metadata = Some(resp.metadata.clone());
        self.summary = Some(Summary {
            markdown: resp.summary_markdown,
            plain: resp.summary,
            metadata: resp.metadata,
            statistics: None,
        });
        self.document_ready = true;
    }

    /// Replaces the displayed summary, keeping metadata in step with it.
    pub fn set_summary(&mut self, summary: Summary) {
        self.last_metadata = Some(summary.metadata.clone());
        self.summary = Some(summary);
    }
}
