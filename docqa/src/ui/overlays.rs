//! Modal layers drawn on top of the panels: the error modal, the context
//! preview, and the backend-unavailable banner.
//!
//! Each overlay erases its area with `Clear` first, inside the same
//! `terminal.draw()` closure as the panels.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
    Frame,
};

use docqa_core::workflow::ContextPreview;

use crate::theme::Theme;

pub fn render_banner(frame: &mut Frame, area: Rect, text: &str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(format!(" {text}"))
            .style(Style::default().bg(theme.banner_bg).fg(theme.banner_fg).add_modifier(Modifier::BOLD)),
        area,
    );
}

/// Centered error box. Dismissed with Enter or Esc.
pub fn render_modal(frame: &mut Frame, message: &str, theme: &Theme) {
    let area = frame.area();
    if area.width < 20 || area.height < 7 {
        return;
    }
    let width = (area.width * 3 / 5).max(40).min(area.width);
    let text_rows = message.chars().count() as u16 / width.saturating_sub(4).max(1) + 1;
    let height = (text_rows + 4).min(area.height);
    let modal_area = area.centered(Constraint::Length(width), Constraint::Length(height));

    frame.render_widget(Clear, modal_area);
    let block = Block::bordered()
        .title(" Error ")
        .title_bottom(Line::from(" Enter / Esc to dismiss ").right_aligned())
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.modal_border));
    frame.render_widget(
        Paragraph::new(vec![Line::default(), Line::raw(message.to_owned())])
            .block(block)
            .wrap(Wrap { trim: true })
            .centered(),
        modal_area,
    );
}

/// Passages the backend would retrieve for a question.
pub fn render_context(frame: &mut Frame, preview: &ContextPreview, theme: &Theme) {
    if frame.area().width < 40 {
        return;
    }
    let area = frame.area().centered(Constraint::Percentage(80), Constraint::Percentage(70));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(format!(" Context for \"{}\" ", preview.question))
        .title_bottom(Line::from(" Esc to close ").right_aligned())
        .border_style(Style::default().fg(theme.border_active));

    let mut lines = Vec::new();
    if preview.snippets.is_empty() {
        lines.push(Line::styled(
            "No relevant passages found.",
            Style::default().fg(theme.chat_placeholder),
        ));
    }
    for snippet in &preview.snippets {
        lines.push(Line::from(Span::styled(
            format!("#{}", snippet.relevance_rank),
            Style::default().fg(theme.md_heading).add_modifier(Modifier::BOLD),
        )));
        lines.extend(snippet.content.lines().map(|l| Line::raw(l.to_owned())));
        lines.push(Line::default());
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
