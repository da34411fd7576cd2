//! The upload → analyze → summarize → converse workflow controller.
//!
//! [`Workflow`] is a pure state machine. User actions are methods that mutate
//! state and return the [`Command`]s that must run; finished commands come
//! back as [`Outcome`]s through [`Workflow::apply`], which may emit follow-up
//! commands. `Workflow` itself performs no I/O. [`execute`] runs one command against
//! a [`Backend`], and the caller decides where that happens (a spawned task in
//! the TUI, inline in tests).
//!
//! # Stale responses
//!
//! Every command except `Ask` and `Health` carries a [`Ticket`]: the session
//! epoch at issue time plus a sequence number. Only the most recently issued
//! ticket of each kind is accepted, and only while the session epoch is
//! unchanged, so a slow response to a superseded request is dropped instead of
//! overwriting newer state. Answers are matched by placeholder id, which the
//! chat log never reuses.
//!
//! # Question gating
//!
//! Questions and context previews are only sent while a document is ready.
//! Without one, nothing is appended and no request is made.

use tracing::{debug, info, warn};

use crate::api::Backend;
use crate::chat::{MessageId, Resolution};
use crate::error::{ApiResult, ValidationError};
use crate::session::Session;
use crate::types::{
    AnalyzeResponse, AskRequest, AskResponse, ContextRequest, ContextResponse, ContextSnippet,
    DocumentInput, HealthResponse, StatusResponse, SuggestResponse, Summary, SummaryResponse,
};
use crate::validate;

/// Text shown when the backend answers without an `answer` field.
pub const NO_ANSWER_TEXT: &str = "No answer available.";

/// Context snippets requested when the caller does not say otherwise.
pub const DEFAULT_MAX_CONTEXTS: u8 = 3;

/// Upper bound the backend enforces on context snippets.
pub const MAX_CONTEXTS: u8 = 5;

/// Identifies one issued request for stale-response detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    seq: u64,
}

/// Why a summary is being fetched; decides how failures surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryReason {
    /// User asked to re-render the current summary. Failures show inline.
    Refresh,
    /// Startup reattachment to a live backend session. Failures are silent.
    Restore,
}

/// A request the workflow wants executed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Analyze { ticket: Ticket, input: DocumentInput },
    Summary { ticket: Ticket, reason: SummaryReason, doc_id: Option<String> },
    Ask { placeholder: MessageId, request: AskRequest },
    Suggest { ticket: Ticket },
    Status { ticket: Ticket },
    Context { ticket: Ticket, request: ContextRequest },
    Health,
}

impl Command {
    /// Endpoint-ish name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Analyze { .. } => "analyze",
            Command::Summary { .. } => "summary",
            Command::Ask { .. } => "ask",
            Command::Suggest { .. } => "suggest",
            Command::Status { .. } => "status",
            Command::Context { .. } => "context",
            Command::Health => "health",
        }
    }
}

/// The result of executing a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Analyzed { ticket: Ticket, result: ApiResult<AnalyzeResponse> },
    Summary { ticket: Ticket, reason: SummaryReason, result: ApiResult<SummaryResponse> },
    Answered { placeholder: MessageId, result: ApiResult<AskResponse> },
    Suggested { ticket: Ticket, result: ApiResult<SuggestResponse> },
    Status { ticket: Ticket, result: ApiResult<StatusResponse> },
    Context { ticket: Ticket, question: String, result: ApiResult<ContextResponse> },
    Health { result: ApiResult<HealthResponse> },
}

/// Runs one command against `backend`.
pub async fn execute(backend: &dyn Backend, command: Command) -> Outcome {
    match command {
        Command::Analyze { ticket, input } => {
            Outcome::Analyzed { ticket, result: backend.analyze(&input).await }
        }
        Command::Summary { ticket, reason, doc_id } => Outcome::Summary {
            ticket,
            reason,
            result: backend.summary(doc_id.as_deref()).await,
        },
        Command::Ask { placeholder, request } => {
            Outcome::Answered { placeholder, result: backend.ask(&request).await }
        }
        Command::Suggest { ticket } => {
            Outcome::Suggested { ticket, result: backend.suggestions().await }
        }
        Command::Status { ticket } => Outcome::Status { ticket, result: backend.status().await },
        Command::Context { ticket, request } => {
            let result = backend.context(&request).await;
            Outcome::Context { ticket, question: request.question, result }
        }
        Command::Health => Outcome::Health { result: backend.health().await },
    }
}

/// Severity of the one-line status notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Retrieved passages shown in the context overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPreview {
    pub question: String,
    pub snippets: Vec<ContextSnippet>,
}

/// Latest ticket issued per request kind; `None` when nothing is pending.
#[derive(Debug, Default)]
struct Pending {
    analyze: Option<Ticket>,
    summary: Option<Ticket>,
    suggest: Option<Ticket>,
    status: Option<Ticket>,
    context: Option<Ticket>,
}

/// State of the document Q&A workflow.
#[derive(Debug, Default)]
pub struct Workflow {
    session: Session,
    pending: Pending,
    next_seq: u64,
    /// Text in the question box. Suggestions are copied here.
    pub question_input: String,
    /// Modal error (analyze and validation failures).
    pub modal: Option<String>,
    /// Persistent backend-unavailable banner.
    pub banner: Option<String>,
    /// Inline error in the summary area.
    pub summary_error: Option<String>,
    pub notice: Option<Notice>,
    pub context_preview: Option<ContextPreview>,
    /// Last successful health response.
    pub health: Option<HealthResponse>,
    spinner: usize,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn document_ready(&self) -> bool {
        self.session.document_ready
    }

    /// The chat panel is shown exactly when a document is ready.
    pub fn chat_visible(&self) -> bool {
        self.session.document_ready
    }

    pub fn suggestions_visible(&self) -> bool {
        self.session.document_ready && self.session.suggestions.visible
    }

    pub fn analyzing(&self) -> bool {
        self.pending.analyze.is_some()
    }

    pub fn summary_loading(&self) -> bool {
        self.pending.summary.is_some()
    }

    pub fn suggestions_loading(&self) -> bool {
        self.pending.suggest.is_some()
    }

    /// True while any request that drives the progress indicator is in flight.
    pub fn busy(&self) -> bool {
        self.analyzing() || self.summary_loading() || self.session.chat.pending() > 0
    }

    /// Indeterminate progress frame, advanced by [`tick`](Self::tick).
    pub fn spinner_frame(&self) -> usize {
        self.spinner
    }

    /// Advances the indeterminate progress indicator while busy.
    pub fn tick(&mut self) {
        if self.busy() {
            self.spinner = self.spinner.wrapping_add(1);
        } else {
            self.spinner = 0;
        }
    }

    fn issue(&mut self) -> Ticket {
        self.next_seq += 1;
        Ticket { epoch: self.session.epoch(), seq: self.next_seq }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice { level: NoticeLevel::Info, text: text.into() });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice { level: NoticeLevel::Error, text: text.into() });
    }

    /// Drops the document and everything derived from it.
    fn reset_document(&mut self) {
        self.session.clear();
        self.pending = Pending::default();
        self.summary_error = None;
        self.context_preview = None;
    }

    // -----------------------------------------------------------------------
    // Document submission
    // -----------------------------------------------------------------------

    /// Validates `input` and, if it passes, starts a new analysis.
    ///
    /// A validation failure is shown in the modal and leaves the current
    /// document untouched. On success the previous document, chat and
    /// suggestions are cleared before the request is issued.
    pub fn submit_document(&mut self, input: DocumentInput) -> Result<Vec<Command>, ValidationError> {
        let checked = match &input {
            DocumentInput::Pdf(pdf) => validate::validate_pdf(pdf),
            DocumentInput::Url(url) => validate::validate_url(url).map(|_| ()),
        };
        if let Err(e) = checked {
            self.modal = Some(e.to_string());
            return Err(e);
        }
        let input = match input {
            DocumentInput::Url(url) => DocumentInput::Url(url.trim().to_owned()),
            pdf => pdf,
        };

        self.reset_document();
        self.modal = None;
        let ticket = self.issue();
        self.pending.analyze = Some(ticket);
        info!(source = %input.describe(), "submitting document");
        self.info(format!("Analyzing {}...", input.describe()));
        Ok(vec![Command::Analyze { ticket, input }])
    }

    /// Parses free-form source text (path or URL) and submits it.
    pub fn submit_source(&mut self, raw: &str) -> Result<Vec<Command>, ValidationError> {
        match validate::parse_source(raw) {
            Ok(input) => self.submit_document(input),
            Err(e) => {
                self.modal = Some(e.to_string());
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Questions
    // -----------------------------------------------------------------------

    /// Sends `raw` as a question.
    ///
    /// Empty input is a no-op. Without a ready document nothing is appended or
    /// sent. Otherwise the user message and a placeholder are appended before
    /// the request is returned.
    pub fn ask_question(&mut self, raw: &str) -> Result<Vec<Command>, ValidationError> {
        let question = match validate::normalize_question(raw) {
            Ok(Some(q)) => q,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => {
                self.error(e.to_string());
                return Err(e);
            }
        };
        if !self.session.document_ready {
            self.error("Analyze a document first.");
            return Ok(Vec::new());
        }

        self.session.chat.push_user(question.clone());
        let placeholder = self.session.chat.push_thinking();
        let request = AskRequest { question, doc_id: self.session.doc_id.clone() };
        Ok(vec![Command::Ask { placeholder, request }])
    }

    /// Sends the contents of the question box, clearing it once dispatched.
    pub fn submit_question(&mut self) -> Result<Vec<Command>, ValidationError> {
        let raw = self.question_input.clone();
        let commands = self.ask_question(&raw)?;
        if !commands.is_empty() {
            self.question_input.clear();
        }
        Ok(commands)
    }

    /// Requests the passages the backend would retrieve for `raw`.
    pub fn preview_context(&mut self, raw: &str, max_contexts: u8) -> Result<Vec<Command>, ValidationError> {
        let question = match validate::normalize_question(raw) {
            Ok(Some(q)) => q,
            Ok(None) => {
                self.error("Type a question to preview its context.");
                return Ok(Vec::new());
            }
            Err(e) => {
                self.error(e.to_string());
                return Err(e);
            }
        };
        if !self.session.document_ready {
            self.error("Analyze a document first.");
            return Ok(Vec::new());
        }
        let ticket = self.issue();
        self.pending.context = Some(ticket);
        let request = ContextRequest { question, max_contexts: max_contexts.clamp(1, MAX_CONTEXTS) };
        Ok(vec![Command::Context { ticket, request }])
    }

    // -----------------------------------------------------------------------
    // Summary, suggestions, startup
    // -----------------------------------------------------------------------

    fn summary_command(&mut self, reason: SummaryReason) -> Command {
        let ticket = self.issue();
        self.pending.summary = Some(ticket);
        Command::Summary { ticket, reason, doc_id: self.session.doc_id.clone() }
    }

    /// Re-fetches the current summary. No-op without a ready document.
    pub fn refresh_summary(&mut self) -> Vec<Command> {
        if !self.session.document_ready {
            self.error("No document to summarize yet.");
            return Vec::new();
        }
        self.summary_error = None;
        vec![self.summary_command(SummaryReason::Refresh)]
    }

    /// Fetches suggested questions, replacing any earlier set when it lands.
    pub fn load_suggestions(&mut self) -> Vec<Command> {
        if !self.session.document_ready {
            return Vec::new();
        }
        let ticket = self.issue();
        self.pending.suggest = Some(ticket);
        vec![Command::Suggest { ticket }]
    }

    /// Shows or hides the suggestion list, loading it on first show.
    pub fn toggle_suggestions(&mut self) -> Vec<Command> {
        if !self.session.document_ready {
            return Vec::new();
        }
        let suggestions = &mut self.session.suggestions;
        suggestions.visible = !suggestions.visible;
        if suggestions.visible && suggestions.is_empty() && self.pending.suggest.is_none() {
            self.load_suggestions()
        } else {
            Vec::new()
        }
    }

    /// Copies suggestion `index` into the question box and hides the list.
    ///
    /// Does not submit. Returns `false` for an out-of-range index.
    pub fn choose_suggestion(&mut self, index: usize) -> bool {
        let Some(text) = self.session.suggestions.get(index).map(str::to_owned) else {
            return false;
        };
        self.question_input = text;
        self.session.suggestions.visible = false;
        true
    }

    /// Asks the backend whether a document from an earlier run is still loaded.
    pub fn restore_session_on_load(&mut self) -> Vec<Command> {
        let ticket = self.issue();
        self.pending.status = Some(ticket);
        vec![Command::Status { ticket }]
    }

    pub fn check_backend_health(&mut self) -> Vec<Command> {
        vec![Command::Health]
    }

    // -----------------------------------------------------------------------
    // Local actions
    // -----------------------------------------------------------------------

    /// Forgets the current document. Pending responses for it are discarded.
    pub fn new_chat(&mut self) {
        self.reset_document();
        self.question_input.clear();
        self.info("Started a new chat. Open a PDF or URL to begin.");
    }

    /// Empties the conversation but keeps the document.
    pub fn clear_chat(&mut self) {
        self.session.chat.clear();
        self.info("Chat cleared.");
    }

    pub fn dismiss_modal(&mut self) {
        self.modal = None;
    }

    pub fn dismiss_context(&mut self) {
        self.context_preview = None;
    }

    // -----------------------------------------------------------------------
    // Outcomes
    // -----------------------------------------------------------------------

    /// Returns true when `ticket` is the latest of its kind for this epoch,
    /// clearing the pending slot.
    fn accept(slot: &mut Option<Ticket>, ticket: Ticket, epoch: u64) -> bool {
        if *slot == Some(ticket) && ticket.epoch == epoch {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Folds a finished request into state. Returns follow-up commands.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Command> {
        let epoch = self.session.epoch();
        match outcome {
            Outcome::Analyzed { ticket, result } => {
                if !Self::accept(&mut self.pending.analyze, ticket, epoch) {
                    debug!(?ticket, "discarding stale analyze response");
                    return Vec::new();
                }
                match result {
                    Ok(resp) => {
                        let label = resp.metadata.source_type.label();
                        let text = resp
                            .message
                            .clone()
                            .unwrap_or_else(|| format!("Successfully analyzed {label}"));
                        info!(source = label, words = resp.metadata.word_count, "document analyzed");
                        // Id-only replies leave the summary to a follow-up fetch.
                        let fetch_summary = resp.doc_id.as_deref().is_some_and(|id| !id.is_empty())
                            && [&resp.summary, &resp.summary_markdown]
                                .iter()
                                .all(|s| s.as_deref().is_none_or(|s| s.trim().is_empty()));
                        self.session.attach(resp);
                        self.session.suggestions.visible = true;
                        self.info(text);
                        let mut commands = Vec::new();
                        if fetch_summary {
                            commands.push(self.summary_command(SummaryReason::Refresh));
                        }
                        commands.extend(self.load_suggestions());
                        commands
                    }
                    Err(e) => {
                        warn!(error = %e, "analyze failed");
                        self.modal = Some(e.to_string());
                        self.error("Analysis failed.");
                        Vec::new()
                    }
                }
            }

            Outcome::Summary { ticket, reason, result } => {
                if !Self::accept(&mut self.pending.summary, ticket, epoch) {
                    debug!(?ticket, "discarding stale summary response");
                    return Vec::new();
                }
                match (reason, result) {
                    (SummaryReason::Refresh, Ok(resp)) => {
                        self.session.set_summary(Summary::from(resp));
                        self.summary_error = None;
                        Vec::new()
                    }
                    (SummaryReason::Refresh, Err(e)) => {
                        warn!(error = %e, "summary refresh failed");
                        self.summary_error = Some(format!("Error loading summary: {e}"));
                        Vec::new()
                    }
                    (SummaryReason::Restore, Ok(resp)) => {
                        info!("reattached to existing backend session");
                        self.session.set_summary(Summary::from(resp));
                        self.session.document_ready = true;
                        self.session.suggestions.visible = true;
                        self.info("Restored previously analyzed document.");
                        self.load_suggestions()
                    }
                    (SummaryReason::Restore, Err(e)) => {
                        debug!(error = %e, "session restore: summary unavailable");
                        Vec::new()
                    }
                }
            }

            Outcome::Answered { placeholder, result } => {
                let resolution = match result {
                    Ok(resp) => Resolution::Answer {
                        text: resp
                            .answer
                            .filter(|a| !a.trim().is_empty())
                            .unwrap_or_else(|| NO_ANSWER_TEXT.to_owned()),
                        context_used: resp.context_used,
                    },
                    Err(e) => {
                        warn!(error = %e, "ask failed");
                        Resolution::Failed(format!("Error: {e}"))
                    }
                };
                if !self.session.chat.resolve(placeholder, resolution) {
                    debug!(?placeholder, "discarding answer for a cleared conversation");
                }
                Vec::new()
            }

            Outcome::Suggested { ticket, result } => {
                if !Self::accept(&mut self.pending.suggest, ticket, epoch) {
                    debug!(?ticket, "discarding stale suggestions");
                    return Vec::new();
                }
                match result {
                    Ok(resp) => self.session.suggestions.replace(resp.suggestions),
                    Err(e) => warn!(error = %e, "suggestion fetch failed"),
                }
                Vec::new()
            }

            Outcome::Status { ticket, result } => {
                if !Self::accept(&mut self.pending.status, ticket, epoch) {
                    return Vec::new();
                }
                match result {
                    Ok(StatusResponse { ready: true, .. }) => {
                        vec![self.summary_command(SummaryReason::Restore)]
                    }
                    Ok(_) => {
                        debug!("no document on the backend yet");
                        Vec::new()
                    }
                    Err(e) => {
                        debug!(error = %e, "status check failed");
                        Vec::new()
                    }
                }
            }

            Outcome::Context { ticket, question, result } => {
                if !Self::accept(&mut self.pending.context, ticket, epoch) {
                    return Vec::new();
                }
                match result {
                    Ok(resp) => {
                        self.context_preview =
                            Some(ContextPreview { question, snippets: resp.contexts });
                    }
                    Err(e) => self.error(format!("Context preview failed: {e}")),
                }
                Vec::new()
            }

            Outcome::Health { result } => {
                match result {
                    Ok(resp) => {
                        self.banner = None;
                        self.health = Some(resp);
                    }
                    Err(e) => {
                        warn!(error = %e, "health check failed");
                        self.health = None;
                        self.banner = Some(format!(
                            "Backend unavailable ({e}). Please make sure the server is running."
                        ));
                    }
                }
                Vec::new()
            }
        }
    }

    /// Executes `commands` and every follow-up they produce, one at a time,
    /// until nothing is left to run.
    pub async fn drive(&mut self, backend: &dyn Backend, commands: Vec<Command>) {
        let mut queue: std::collections::VecDeque<Command> = commands.into();
        while let Some(command) = queue.pop_front() {
            let outcome = execute(backend, command).await;
            queue.extend(self.apply(outcome));
        }
    }
}
