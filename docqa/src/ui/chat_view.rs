//! Chat column: suggestion list, transcript, and question box.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use docqa_core::chat::{ChatMessage, MessageKind, Sender};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block, spinner_glyph, wrapped_height};
use crate::ui::markdown::render_markdown;

pub fn render_transcript(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Chat;
    let block = panel_block("Chat", is_focused, theme);
    let inner = inner_rect(area);
    let spinner = state.workflow.spinner_frame();

    let chat = &state.workflow.session().chat;
    let lines: Vec<Line<'static>> = if chat.is_empty() {
        vec![Line::styled(
            "Ask anything about the document. Press `i` to type, `s` for suggestions.",
            Style::default().fg(theme.chat_placeholder),
        )]
    } else {
        chat.messages()
            .iter()
            .flat_map(|m| message_lines(m, spinner, theme))
            .collect()
    };

    state.chat_content_height = wrapped_height(&lines, inner.width);
    let max_scroll = state.chat_content_height.saturating_sub(inner.height);
    if state.chat_follow {
        state.chat_scroll = max_scroll;
    } else {
        state.chat_scroll = state.chat_scroll.min(max_scroll);
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((state.chat_scroll, 0)),
        area,
    );
}

/// Header, body and optional annotation for one message, followed by a blank row.
pub fn message_lines(message: &ChatMessage, spinner: usize, theme: &Theme) -> Vec<Line<'static>> {
    let (who, who_color) = match message.sender {
        Sender::User => ("You", theme.chat_user),
        Sender::Ai => ("Assistant", theme.chat_ai),
    };
    let mut lines = vec![Line::from(Span::styled(
        who,
        Style::default().fg(who_color).add_modifier(Modifier::BOLD),
    ))];

    match (message.sender, message.kind) {
        (_, MessageKind::Thinking) => lines.push(Line::styled(
            format!("{} {}", spinner_glyph(spinner), message.text),
            Style::default().fg(theme.chat_placeholder).add_modifier(Modifier::ITALIC),
        )),
        (_, MessageKind::Error) => {
            lines.push(Line::styled(message.text.clone(), Style::default().fg(theme.chat_error)));
        }
        (Sender::Ai, MessageKind::Normal) => lines.extend(render_markdown(&message.text, theme)),
        (Sender::User, MessageKind::Normal) => lines.extend(
            message
                .text
                .lines()
                .map(|l| Line::styled(l.to_owned(), Style::default().fg(theme.chat_user))),
        ),
    }

    if let Some(n) = message.context_used {
        let noun = if n == 1 { "section" } else { "sections" };
        lines.push(Line::styled(
            format!("Based on {n} relevant {noun}"),
            Style::default().fg(theme.chat_annotation).add_modifier(Modifier::ITALIC),
        ));
    }
    lines.push(Line::default());
    lines
}

pub fn render_suggestions(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let picking = state.mode == Mode::Suggestions;
    let wf = &state.workflow;
    let title = if wf.suggestions_loading() {
        format!("Suggested questions {}", spinner_glyph(wf.spinner_frame()))
    } else {
        "Suggested questions (s)".to_owned()
    };
    let block = panel_block(title, picking, theme);

    let items = wf.session().suggestions.items();
    let list_items: Vec<ListItem> = if items.is_empty() {
        let msg = if wf.suggestions_loading() { "Loading..." } else { "No suggestions yet." };
        vec![ListItem::new(Line::styled(msg, Style::default().fg(theme.chat_placeholder)))]
    } else {
        items.iter().map(|s| ListItem::new(Line::raw(s.clone()))).collect()
    };

    let mut list_state = ListState::default();
    if picking && !items.is_empty() {
        list_state.select(Some(state.suggestion_cursor.min(items.len() - 1)));
    }
    let list = List::new(list_items)
        .block(block)
        .highlight_symbol("› ")
        .highlight_style(Style::default().fg(theme.selection).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn render_question_box(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let editing = state.mode == Mode::EditQuestion;
    let title = if editing { "Question (Enter to send, Esc to stop)" } else { "Question (i)" };
    let block = panel_block(title, editing, theme);
    let inner = inner_rect(area);

    let text = &state.workflow.question_input;
    // Keep the tail visible when the question is wider than the box.
    let visible_width = usize::from(inner.width.saturating_sub(1));
    let shown: String = {
        let count = text.chars().count();
        text.chars().skip(count.saturating_sub(visible_width)).collect()
    };
    frame.render_widget(Paragraph::new(shown.clone()).block(block), area);

    if editing {
        let x = inner.x + shown.chars().count() as u16;
        frame.set_cursor_position(Position { x: x.min(inner.right().saturating_sub(1)), y: inner.y });
    }
}
