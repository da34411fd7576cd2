//! Integration tests for the document workflow.
//!
//! Exercises: submit_document, submit_source, ask_question, refresh_summary,
//! load/toggle/choose suggestions, restore_session_on_load,
//! check_backend_health, preview_context, new_chat, clear_chat, stale-response
//! handling.

mod common;

use common::{analyzed, http, pdf_metadata, suggestions, FakeBackend};
use docqa_core::chat::{MessageKind, Sender, THINKING_TEXT};
use docqa_core::error::{ValidationError, MAX_PDF_BYTES};
use docqa_core::types::{
    AnalyzeResponse, AskResponse, ContextResponse, ContextSnippet, DocumentInput,
    HealthResponse, Metadata, PdfUpload, SourceType, StatusResponse, SummaryResponse,
};
use docqa_core::workflow::{execute, Command, NoticeLevel, Outcome, Workflow};

fn pdf(name: &str, content_type: &str, len: usize) -> DocumentInput {
    DocumentInput::Pdf(PdfUpload {
        filename: name.to_owned(),
        content_type: content_type.to_owned(),
        bytes: vec![0u8; len],
    })
}

/// Workflow with `report.pdf` analyzed and suggestions loaded.
async fn ready_workflow(backend: &FakeBackend) -> Workflow {
    FakeBackend::set(&backend.analyze, Ok(analyzed("## Summary", pdf_metadata(1200))));
    FakeBackend::set(&backend.suggest, Ok(suggestions(&["Q1", "Q2"])));
    let mut wf = Workflow::new();
    let cmds = wf.submit_document(pdf("report.pdf", "application/pdf", 1024)).unwrap();
    wf.drive(backend, cmds).await;
    assert!(wf.document_ready());
    wf
}

#[tokio::test]
async fn non_pdf_is_rejected_before_any_request() {
    let backend = FakeBackend::new();
    let mut wf = Workflow::new();

    let err = wf.submit_document(pdf("notes.txt", "text/plain", 10)).unwrap_err();
    assert!(matches!(err, ValidationError::NotPdf { .. }));
    assert_eq!(wf.modal.as_deref(), Some(err.to_string().as_str()));
    assert!(!wf.analyzing());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn oversized_pdf_is_rejected_before_any_request() {
    let backend = FakeBackend::new();
    let mut wf = Workflow::new();

    let err = wf
        .submit_document(pdf("big.pdf", "application/pdf", MAX_PDF_BYTES as usize + 1))
        .unwrap_err();
    assert_eq!(err, ValidationError::TooLarge { size: MAX_PDF_BYTES + 1 });
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn oversized_file_on_disk_is_rejected_without_reading_it() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("huge.pdf");
    let file = std::fs::File::create(&path).unwrap();
    file.set_len(MAX_PDF_BYTES + 1).unwrap();

    let mut wf = Workflow::new();
    let err = wf.submit_source(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, ValidationError::TooLarge { .. }));
    assert!(wf.modal.is_some());
}

#[tokio::test]
async fn validation_failure_keeps_current_document() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;

    assert!(wf.submit_source("ftp://example.com/file").is_err());
    assert!(wf.document_ready());
    assert!(wf.session().summary.is_some());
}

#[tokio::test]
async fn report_pdf_shows_word_count_and_opens_chat() {
    let backend = FakeBackend::new();
    FakeBackend::set(
        &backend.analyze,
        Ok(AnalyzeResponse {
            summary_markdown: Some("- point one\n- point two".into()),
            metadata: Metadata { source_type: SourceType::Pdf, word_count: 1200, ..Default::default() },
            ..Default::default()
        }),
    );
    FakeBackend::set(&backend.suggest, Ok(suggestions(&["Q1"])));

    let mut wf = Workflow::new();
    assert!(!wf.chat_visible());
    let cmds = wf
        .submit_document(pdf("report.pdf", "application/pdf", 5 * 1024 * 1024))
        .unwrap();
    assert!(wf.analyzing());
    wf.drive(&backend, cmds).await;

    assert!(!wf.analyzing());
    assert!(wf.chat_visible());
    assert!(wf.suggestions_visible());
    let metadata = wf.session().last_metadata.clone().unwrap();
    assert!(metadata.display_line().contains("Words: 1,200"));
    assert!(metadata.display_rows().contains(&("Words", "1,200".to_owned())));
    assert_eq!(backend.calls(), vec!["analyze", "suggest"]);
}

#[tokio::test]
async fn url_failure_shows_server_error_verbatim() {
    let backend = FakeBackend::new();
    FakeBackend::set(&backend.analyze, Err(http(500, "Failed to analyze URL")));

    let mut wf = Workflow::new();
    let cmds = wf.submit_source("https://example.com").unwrap();
    assert!(matches!(&cmds[..], [Command::Analyze { input: DocumentInput::Url(u), .. }] if u == "https://example.com"));
    wf.drive(&backend, cmds).await;

    assert_eq!(wf.modal.as_deref(), Some("Failed to analyze URL"));
    assert!(!wf.chat_visible());
    assert!(wf.session().summary.is_none());
    assert_eq!(backend.count("suggest"), 0);
}

#[tokio::test]
async fn failed_suggestions_do_not_affect_summary() {
    let backend = FakeBackend::new();
    FakeBackend::set(&backend.analyze, Ok(analyzed("## S", pdf_metadata(10))));
    FakeBackend::set(&backend.suggest, Err(http(500, "Failed to generate suggestions")));

    let mut wf = Workflow::new();
    let cmds = wf.submit_document(pdf("a.pdf", "application/pdf", 10)).unwrap();
    wf.drive(&backend, cmds).await;

    assert!(wf.document_ready());
    assert!(wf.session().summary.is_some());
    assert!(wf.session().suggestions.is_empty());
    assert!(wf.modal.is_none());
    assert_ne!(wf.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
}

#[tokio::test]
async fn new_analysis_clears_previous_chat() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;
    FakeBackend::set(&backend.ask, Ok(AskResponse { answer: Some("A".into()), context_used: 1 }));
    let cmds = wf.ask_question("What is this about?").unwrap();
    wf.drive(&backend, cmds).await;
    assert_eq!(wf.session().chat.len(), 2);

    let cmds = wf.submit_source("https://example.com/other").unwrap();
    assert!(wf.session().chat.is_empty(), "cleared as soon as the submission starts");
    wf.drive(&backend, cmds).await;
    assert!(wf.session().chat.is_empty());
    assert!(wf.chat_visible());
}

#[tokio::test]
async fn question_without_document_is_not_sent() {
    let backend = FakeBackend::new();
    let mut wf = Workflow::new();

    let cmds = wf.ask_question("What is this about?").unwrap();
    assert!(cmds.is_empty());
    assert!(wf.session().chat.is_empty());
    assert_eq!(wf.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
    wf.drive(&backend, cmds).await;
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn blank_question_is_a_silent_noop() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;
    let notice_before = wf.notice.clone();

    let cmds = wf.ask_question("   ").unwrap();
    assert!(cmds.is_empty());
    assert!(wf.session().chat.is_empty());
    assert_eq!(wf.notice, notice_before);
}

#[tokio::test]
async fn placeholder_is_replaced_by_exactly_one_answer() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;
    FakeBackend::set(
        &backend.ask,
        Ok(AskResponse { answer: Some("It is a report.".into()), context_used: 2 }),
    );

    let cmds = wf.ask_question("  What is this about? ").unwrap();
    let msgs = wf.session().chat.messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!((msgs[0].sender, msgs[0].text.as_str()), (Sender::User, "What is this about?"));
    assert!(msgs[1].is_placeholder());
    assert_eq!(msgs[1].text, THINKING_TEXT);
    assert!(wf.busy());

    wf.drive(&backend, cmds).await;
    let msgs = wf.session().chat.messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[1].sender, Sender::Ai);
    assert_eq!(msgs[1].text, "It is a report.");
    assert_eq!(msgs[1].context_used, Some(2));
    assert_eq!(wf.session().chat.pending(), 0);
    assert_eq!(backend.asked()[0].question, "What is this about?");
    assert_eq!(backend.asked()[0].doc_id, None);
}

#[tokio::test]
async fn failed_answer_becomes_error_bubble() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;
    FakeBackend::set(&backend.ask, Err(http(500, "Failed to generate answer")));

    let cmds = wf.ask_question("Why?").unwrap();
    wf.drive(&backend, cmds).await;

    let msgs = wf.session().chat.messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[1].kind, MessageKind::Error);
    assert_eq!(msgs[1].text, "Error: Failed to generate answer");
    assert_eq!(backend.count("ask"), 1, "no automatic retry");
}

#[tokio::test]
async fn overlapping_questions_each_resolve_their_own_placeholder() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;

    let first = wf.ask_question("first?").unwrap().remove(0);
    let second = wf.ask_question("second?").unwrap().remove(0);
    assert_eq!(wf.session().chat.pending(), 2);

    // Second answer lands first.
    FakeBackend::set(&backend.ask, Ok(AskResponse { answer: Some("two".into()), context_used: 0 }));
    let out2 = execute(&backend, second).await;
    FakeBackend::set(&backend.ask, Ok(AskResponse { answer: Some("one".into()), context_used: 0 }));
    let out1 = execute(&backend, first).await;
    wf.apply(out2);
    wf.apply(out1);

    let texts: Vec<&str> = wf.session().chat.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["first?", "one", "second?", "two"]);
}

#[tokio::test]
async fn answer_after_new_chat_is_discarded() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;
    FakeBackend::set(&backend.ask, Ok(AskResponse { answer: Some("late".into()), context_used: 0 }));

    let cmd = wf.ask_question("question?").unwrap().remove(0);
    wf.new_chat();
    let outcome = execute(&backend, cmd).await;
    assert!(wf.apply(outcome).is_empty());
    assert!(wf.session().chat.is_empty());
    assert!(!wf.chat_visible());
}

#[tokio::test]
async fn answer_after_clear_chat_is_discarded_but_document_stays() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;
    FakeBackend::set(&backend.ask, Ok(AskResponse { answer: Some("late".into()), context_used: 2 }));

    let cmd = wf.ask_question("question?").unwrap().remove(0);
    wf.clear_chat();
    let outcome = execute(&backend, cmd).await;
    assert!(wf.apply(outcome).is_empty());
    assert!(wf.session().chat.is_empty());
    assert!(wf.document_ready());
    assert!(wf.chat_visible());
}

#[tokio::test]
async fn refresh_summary_renders_identically() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;
    FakeBackend::set(
        &backend.summary,
        Ok(SummaryResponse {
            summary_markdown: Some("## Key points\n- a\n- b".into()),
            metadata: pdf_metadata(1200),
            ..Default::default()
        }),
    );

    let cmds = wf.refresh_summary();
    wf.drive(&backend, cmds).await;
    let first = wf.session().summary.clone();
    let cmds = wf.refresh_summary();
    wf.drive(&backend, cmds).await;

    assert_eq!(wf.session().summary, first);
    assert_eq!(first.unwrap().body(), ("## Key points\n- a\n- b", true));
    assert_eq!(backend.count("summary"), 2);
}

#[tokio::test]
async fn refresh_failure_shows_inline_error_and_keeps_chat() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;
    FakeBackend::set(&backend.ask, Ok(AskResponse { answer: Some("A".into()), context_used: 0 }));
    let cmds = wf.ask_question("Q?").unwrap();
    wf.drive(&backend, cmds).await;
    FakeBackend::set(&backend.summary, Err(http(500, "Failed to get summary")));

    let cmds = wf.refresh_summary();
    wf.drive(&backend, cmds).await;

    assert_eq!(wf.summary_error.as_deref(), Some("Error loading summary: Failed to get summary"));
    assert_eq!(wf.session().chat.len(), 2);
    assert!(wf.session().summary.is_some());
    assert!(wf.modal.is_none());
}

#[tokio::test]
async fn suggestions_copy_verbatim_without_submitting() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;

    assert_eq!(wf.session().suggestions.items(), ["Q1", "Q2"]);
    for (i, expected) in ["Q1", "Q2"].iter().enumerate() {
        if !wf.suggestions_visible() {
            assert!(wf.toggle_suggestions().is_empty());
        }
        assert!(wf.choose_suggestion(i));
        assert_eq!(wf.question_input, *expected);
        assert!(!wf.suggestions_visible());
    }
    assert!(!wf.choose_suggestion(2));
    assert_eq!(backend.count("ask"), 0);
}

#[tokio::test]
async fn toggle_loads_suggestions_only_when_empty() {
    let backend = FakeBackend::new();
    let mut wf = ready_workflow(&backend).await;
    assert!(wf.suggestions_visible());

    assert!(wf.toggle_suggestions().is_empty());
    assert!(!wf.suggestions_visible());
    assert!(wf.toggle_suggestions().is_empty(), "already loaded");
    assert!(wf.suggestions_visible());

    let cmds = wf.load_suggestions();
    wf.drive(&backend, cmds).await;
    assert_eq!(wf.session().suggestions.items().len(), 2, "reload replaces, not appends");
}

#[tokio::test]
async fn stale_analyze_response_is_discarded() {
    let mut wf = Workflow::new();

    let first = wf.submit_source("https://first.example.com").unwrap().remove(0);
    let second = wf.submit_source("https://second.example.com").unwrap().remove(0);
    let (Command::Analyze { ticket: t1, .. }, Command::Analyze { ticket: t2, .. }) = (first, second) else {
        panic!("expected analyze commands");
    };

    let meta = |title: &str| Metadata {
        source_type: SourceType::Url,
        title: Some(title.to_owned()),
        ..Default::default()
    };
    wf.apply(Outcome::Analyzed { ticket: t2, result: Ok(analyzed("second", meta("Second"))) });
    wf.apply(Outcome::Analyzed { ticket: t1, result: Ok(analyzed("first", meta("First"))) });

    let shown = wf.session().last_metadata.clone().unwrap();
    assert_eq!(shown.title.as_deref(), Some("Second"));
    assert!(!wf.analyzing());
}

#[tokio::test]
async fn restore_reattaches_when_backend_is_ready() {
    let backend = FakeBackend::new();
    FakeBackend::set(&backend.status, Ok(StatusResponse { ready: true, ..Default::default() }));
    FakeBackend::set(
        &backend.summary,
        Ok(SummaryResponse { summary: Some("Plain summary".into()), metadata: pdf_metadata(50), ..Default::default() }),
    );
    FakeBackend::set(&backend.suggest, Ok(suggestions(&["Q1"])));

    let mut wf = Workflow::new();
    let cmds = wf.restore_session_on_load();
    wf.drive(&backend, cmds).await;

    assert_eq!(backend.calls(), vec!["status", "summary", "suggest"]);
    assert!(wf.chat_visible());
    assert!(wf.suggestions_visible());
    assert_eq!(wf.session().summary.as_ref().unwrap().body(), ("Plain summary", false));
}

#[tokio::test]
async fn restore_is_silent_when_not_ready_or_unreachable() {
    let backend = FakeBackend::new();
    FakeBackend::set(&backend.status, Ok(StatusResponse { ready: false, ..Default::default() }));
    let mut wf = Workflow::new();
    let cmds = wf.restore_session_on_load();
    wf.drive(&backend, cmds).await;
    assert_eq!(backend.calls(), vec!["status"]);
    assert!(!wf.chat_visible());
    assert!(wf.modal.is_none() && wf.notice.is_none() && wf.banner.is_none());

    let backend = FakeBackend::new();
    let mut wf = Workflow::new();
    let cmds = wf.restore_session_on_load();
    wf.drive(&backend, cmds).await;
    assert!(wf.modal.is_none() && wf.notice.is_none() && wf.banner.is_none());
}

#[tokio::test]
async fn restore_is_dropped_if_user_submits_meanwhile() {
    let backend = FakeBackend::new();
    FakeBackend::set(&backend.status, Ok(StatusResponse { ready: true, ..Default::default() }));
    let mut wf = Workflow::new();

    let status = wf.restore_session_on_load().remove(0);
    let _analyze = wf.submit_source("https://example.com").unwrap();
    let outcome = execute(&backend, status).await;
    assert!(wf.apply(outcome).is_empty());
    assert!(wf.analyzing());
}

#[tokio::test]
async fn health_failure_sets_banner_until_recovery() {
    let backend = FakeBackend::new();
    let mut wf = Workflow::new();

    let cmds = wf.check_backend_health();
    wf.drive(&backend, cmds).await;
    assert!(wf.banner.as_deref().unwrap().contains("Backend unavailable"));

    FakeBackend::set(
        &backend.health,
        Ok(HealthResponse { status: Some("healthy".into()), ..Default::default() }),
    );
    let cmds = wf.check_backend_health();
    wf.drive(&backend, cmds).await;
    assert!(wf.banner.is_none());
    assert_eq!(wf.health.as_ref().and_then(|h| h.status.as_deref()), Some("healthy"));
}

#[tokio::test]
async fn doc_id_is_threaded_when_server_issues_one() {
    let backend = FakeBackend::new();
    FakeBackend::set(
        &backend.analyze,
        Ok(AnalyzeResponse { doc_id: Some("doc-42".into()), ..analyzed("s", pdf_metadata(1)) }),
    );
    FakeBackend::set(&backend.ask, Ok(AskResponse::default()));
    FakeBackend::set(&backend.summary, Ok(SummaryResponse::default()));

    let mut wf = Workflow::new();
    let cmds = wf.submit_source("https://example.com").unwrap();
    wf.drive(&backend, cmds).await;
    let cmds = wf.ask_question("Q?").unwrap();
    wf.drive(&backend, cmds).await;
    let cmds = wf.refresh_summary();
    wf.drive(&backend, cmds).await;

    assert_eq!(backend.asked()[0].doc_id.as_deref(), Some("doc-42"));
    assert_eq!(backend.summary_ids(), vec![Some("doc-42".to_owned())]);
    assert_eq!(wf.session().chat.messages()[1].text, docqa_core::workflow::NO_ANSWER_TEXT);
}

#[tokio::test]
async fn id_only_analyze_reply_fetches_summary() {
    let backend = FakeBackend::new();
    FakeBackend::set(
        &backend.analyze,
        Ok(AnalyzeResponse { doc_id: Some("doc-1".into()), ..AnalyzeResponse::default() }),
    );
    FakeBackend::set(
        &backend.summary,
        Ok(SummaryResponse {
            summary_markdown: Some("Real summary".into()),
            metadata: pdf_metadata(10),
            ..Default::default()
        }),
    );
    FakeBackend::set(&backend.suggest, Ok(suggestions(&["Q1"])));

    let mut wf = Workflow::new();
    let cmds = wf.submit_document(pdf("report.pdf", "application/pdf", 64)).unwrap();
    wf.drive(&backend, cmds).await;

    assert_eq!(backend.count("summary"), 1);
    assert_eq!(backend.summary_ids(), vec![Some("doc-1".to_owned())]);
    let summary = wf.session().summary.as_ref().unwrap();
    assert_eq!(summary.markdown.as_deref(), Some("Real summary"));
    assert!(wf.summary_error.is_none());
    assert!(wf.document_ready());
}

#[tokio::test]
async fn analyze_reply_with_summary_skips_extra_fetch() {
    let backend = FakeBackend::new();
    FakeBackend::set(
        &backend.analyze,
        Ok(AnalyzeResponse { doc_id: Some("doc-1".into()), ..analyzed("## Inline", pdf_metadata(1)) }),
    );
    FakeBackend::set(&backend.suggest, Ok(suggestions(&[])));

    let mut wf = Workflow::new();
    let cmds = wf.submit_source("https://example.com").unwrap();
    wf.drive(&backend, cmds).await;

    assert_eq!(backend.count("summary"), 0);
}

#[tokio::test]
async fn context_preview_requires_document_and_clamps_count() {
    let backend = FakeBackend::new();
    let mut wf = Workflow::new();
    assert!(wf.preview_context("what?", 3).unwrap().is_empty());

    let mut wf = ready_workflow(&backend).await;
    FakeBackend::set(
        &backend.context,
        Ok(ContextResponse {
            contexts: vec![ContextSnippet { content: "passage".into(), relevance_rank: 1 }],
            total_contexts: 1,
        }),
    );
    let cmds = wf.preview_context("what?", 9).unwrap();
    assert!(matches!(&cmds[..], [Command::Context { request, .. }] if request.max_contexts == 5));
    wf.drive(&backend, cmds).await;

    let preview = wf.context_preview.clone().unwrap();
    assert_eq!(preview.question, "what?");
    assert_eq!(preview.snippets[0].content, "passage");
    assert!(wf.session().chat.is_empty(), "preview does not touch the conversation");
}

#[tokio::test]
async fn submit_question_clears_input_only_when_sent() {
    let backend = FakeBackend::new();
    let mut wf = Workflow::new();
    wf.question_input = "early?".into();
    assert!(wf.submit_question().unwrap().is_empty());
    assert_eq!(wf.question_input, "early?");

    let mut wf = ready_workflow(&backend).await;
    wf.question_input = "now?".into();
    assert_eq!(wf.submit_question().unwrap().len(), 1);
    assert!(wf.question_input.is_empty());
}
