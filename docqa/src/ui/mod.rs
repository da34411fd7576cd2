//! UI rendering for docqa.
//!
//! `render()` is the single entry point, called once per `AppEvent::Render`
//! from the event loop's `terminal.draw()` closure. Layout arithmetic lives in
//! `layout.rs`; each panel has its own module.

mod chat_view;
mod help;
pub mod keybindings;
mod layout;
mod markdown;
mod overlays;
mod summary_view;

use ratatui::{
    layout::Position,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, panel_block, render_status_bar};

/// Draws one frame.
///
/// Viewport heights and panel rects are written back into `state` so the next
/// keypress can page and hit-test against what is on screen.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    frame.render_widget(
        ratatui::widgets::Block::default().style(Style::default().bg(theme.background)),
        frame.area(),
    );

    let areas = compute_layout(frame, state);
    state.summary_viewport_height = inner_rect(areas.summary).height;
    state.chat_viewport_height = inner_rect(areas.chat).height;
    state.panel_rects = [areas.summary, areas.chat];

    if let Some(text) = &state.workflow.banner {
        overlays::render_banner(frame, areas.banner, text, theme);
    }
    render_source_line(frame, areas.source, state, theme);
    summary_view::render_summary(frame, areas.summary, state, theme);

    if state.workflow.chat_visible() {
        if areas.suggestions.height > 0 {
            chat_view::render_suggestions(frame, areas.suggestions, state, theme);
        }
        chat_view::render_transcript(frame, areas.chat, state, theme);
        chat_view::render_question_box(frame, areas.question, state, theme);
    }

    render_status_bar(frame, areas.status_bar, state, theme);

    if let Some(preview) = &state.workflow.context_preview {
        overlays::render_context(frame, preview, theme);
    }
    if state.mode == Mode::Help {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
    // Errors sit above everything else.
    if let Some(message) = &state.workflow.modal {
        overlays::render_modal(frame, message, theme);
    }
}

/// The one-line document box: what is loaded, or the path/URL being typed.
fn render_source_line(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    state: &AppState,
    theme: &Theme,
) {
    let editing = state.mode == Mode::EditSource;
    let title = if editing {
        "Open (PDF path or URL, Enter to analyze, Esc to cancel)"
    } else {
        "Document (o to open)"
    };
    let block = panel_block(title, editing, theme);
    let inner = inner_rect(area);

    let line = if editing {
        Line::raw(state.source_input.clone())
    } else {
        let wf = &state.workflow;
        match wf.session().last_metadata.as_ref() {
            Some(meta) => {
                let name = meta
                    .title
                    .clone()
                    .or_else(|| meta.filename.clone())
                    .or_else(|| meta.source_url.clone())
                    .unwrap_or_else(|| meta.source_type.label().to_owned());
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", meta.source_type.label()),
                        Style::default().fg(theme.metadata_label),
                    ),
                    Span::raw(name),
                ])
            }
            None if wf.analyzing() => Line::styled(
                "Analyzing...",
                Style::default().fg(theme.spinner),
            ),
            None => Line::styled(
                "No document loaded",
                Style::default().fg(theme.chat_placeholder),
            ),
        }
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    if editing {
        let x = inner.x + state.source_input.chars().count() as u16;
        frame.set_cursor_position(Position { x: x.min(inner.right().saturating_sub(1)), y: inner.y });
    }
}
